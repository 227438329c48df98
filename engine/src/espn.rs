//! ESPN API raw wire types: serde shapes for the teams listing and the
//! standings document. Mapped into `TeamIdentity` / `StandingsEntry` below.
use crate::analytics::parse_record;
use crate::{LogoVariant, StandingsEntry, TeamIdentity};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Teams listing  (site v2 API: /teams)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamsResponse {
    pub sports: Option<Vec<EspnSport>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnSport {
    pub leagues: Option<Vec<EspnLeague>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLeague {
    pub teams: Option<Vec<EspnTeamEntry>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnTeamEntry {
    pub team: Option<EspnTeam>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EspnTeam {
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    #[serde(rename = "shortDisplayName")]
    pub short_display_name: Option<String>,
    pub nickname: Option<String>,
    pub location: Option<String>,
    pub abbreviation: Option<String>,
    pub logos: Option<Vec<EspnLogo>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnLogo {
    pub href: Option<String>,
    pub rel: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Standings  (v2 API: /standings)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    pub children: Option<Vec<EspnConference>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnConference {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub standings: Option<EspnStandings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStandings {
    pub entries: Option<Vec<EspnStandingsEntry>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStandingsEntry {
    pub team: Option<EspnTeam>,
    pub stats: Option<Vec<EspnStat>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStat {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub stat_type: Option<String>,
    pub value: Option<f64>,
    #[serde(rename = "displayValue")]
    pub display_value: Option<String>,
    pub summary: Option<String>,
}

// ---------------------------------------------------------------------------
// Mapping: wire types → domain types
// ---------------------------------------------------------------------------

/// Entries without an id or display name are dropped.
pub fn map_team(t: &EspnTeam) -> Option<TeamIdentity> {
    let id = t.id.clone().filter(|s| !s.is_empty())?;
    let display_name = t.display_name.clone().filter(|s| !s.is_empty())?;
    let nickname = t
        .nickname
        .clone()
        .or_else(|| t.location.clone())
        .or_else(|| t.short_display_name.clone())
        .unwrap_or_else(|| display_name.clone());
    let logos = t
        .logos
        .iter()
        .flatten()
        .filter_map(|l| {
            Some(LogoVariant {
                href: l.href.clone()?,
                rel: l.rel.clone().unwrap_or_default(),
            })
        })
        .collect();
    Some(TeamIdentity {
        id,
        display_name,
        nickname,
        abbreviation: t.abbreviation.clone().unwrap_or_default(),
        conference: None,
        logos,
    })
}

pub fn map_teams(raw: TeamsResponse) -> Vec<TeamIdentity> {
    raw.sports
        .unwrap_or_default()
        .iter()
        .flat_map(|s| s.leagues.iter().flatten())
        .flat_map(|l| l.teams.iter().flatten())
        .filter_map(|e| e.team.as_ref())
        .filter_map(map_team)
        .collect()
}

fn stat_value(stats: &[EspnStat], name: &str) -> Option<u16> {
    stats
        .iter()
        .find(|s| s.name.as_deref() == Some(name))
        .and_then(|s| s.value)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u16)
}

/// Conference record: ESPN tags it `type: "vsconf"`, older payloads only by name.
fn conference_record(stats: &[EspnStat]) -> Option<(u16, u16)> {
    stats
        .iter()
        .find(|s| {
            s.stat_type.as_deref() == Some("vsconf")
                || s.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case("vsconf"))
        })
        .and_then(|s| s.summary.as_deref().or(s.display_value.as_deref()))
        .and_then(parse_record)
}

pub fn map_standings(raw: StandingsResponse) -> Vec<StandingsEntry> {
    let mut out = Vec::new();
    for conf in raw.children.unwrap_or_default() {
        let conference = conf
            .abbreviation
            .clone()
            .or_else(|| conf.name.clone())
            .unwrap_or_default();
        let entries = conf.standings.and_then(|s| s.entries).unwrap_or_default();
        for entry in entries {
            let Some(mut team) = entry.team.as_ref().and_then(map_team) else {
                continue;
            };
            team.conference = Some(conference.clone());
            let stats = entry.stats.unwrap_or_default();
            let (conference_wins, conference_losses) = conference_record(&stats).unwrap_or((0, 0));
            out.push(StandingsEntry {
                team,
                conference: conference.clone(),
                wins: stat_value(&stats, "wins").unwrap_or(0),
                losses: stat_value(&stats, "losses").unwrap_or(0),
                conference_wins,
                conference_losses,
            });
        }
    }
    out
}
