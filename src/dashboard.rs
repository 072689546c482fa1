use serde::Serialize;

use crate::models::RsvpWithGuests;

const TIME_FORMAT: &str = "%b %-d, %-I:%M %p";
const MISSING: &str = "—";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DietaryNote {
    pub guests: String,
    pub allergies: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ResponseRow {
    pub id: String,
    pub attending: bool,
    pub guests: String,
    pub allergies: String,
    pub parsed_guests: Vec<String>,
    pub submitted: String,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_responses: usize,
    pub attending: usize,
    pub not_attending: usize,
    pub total_guests: usize,
    pub all_guests: Vec<String>,
    pub declined_names: Vec<String>,
    pub dietary_notes: Vec<DietaryNote>,
    pub responses: Vec<ResponseRow>,
}

impl DashboardStats {
    /// Aggregates responses in the order given (newest first when it comes
    /// straight from the store).
    pub fn from_rsvps(rsvps: &[RsvpWithGuests]) -> Self {
        let mut stats = DashboardStats {
            total_responses: rsvps.len(),
            ..Default::default()
        };

        for entry in rsvps {
            let rsvp = &entry.rsvp;
            if rsvp.attending {
                stats.attending += 1;
                stats.all_guests.extend(entry.parsed_guests.iter().cloned());
                if let Some(allergies) = rsvp.allergies.as_deref().filter(|a| !a.is_empty()) {
                    stats.dietary_notes.push(DietaryNote {
                        guests: rsvp
                            .guests
                            .clone()
                            .filter(|g| !g.is_empty())
                            .unwrap_or_else(|| "Unknown".to_string()),
                        allergies: allergies.to_string(),
                    });
                }
            } else {
                stats.not_attending += 1;
                stats.declined_names.extend(entry.parsed_guests.iter().cloned());
            }

            stats.responses.push(ResponseRow {
                id: rsvp.id.clone(),
                attending: rsvp.attending,
                guests: display_or_dash(rsvp.guests.as_deref()),
                allergies: display_or_dash(rsvp.allergies.as_deref()),
                parsed_guests: entry.parsed_guests.clone(),
                submitted: rsvp.created_at.format(TIME_FORMAT).to_string(),
            });
        }

        stats.total_guests = stats.all_guests.len();
        stats
    }
}

fn display_or_dash(s: Option<&str>) -> String {
    match s {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => MISSING.to_string(),
    }
}
