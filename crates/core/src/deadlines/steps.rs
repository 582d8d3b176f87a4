//! Deadline step templates for the two content tracks.
//!
//! Steps within a track form a strict ordered sequence. The order of the
//! slices returned by [`steps_for`] is the order in which steps become
//! "current" for a campaign action.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::schedule::DateKey;
use crate::roles::{ROLE_COMERCIAL, ROLE_POST_VENTA};

/// Content classification of a campaign action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentTrack {
    Technical,
    Ad,
}

impl ContentTrack {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentTrack::Technical => "technical",
            ContentTrack::Ad => "ad",
        }
    }
}

impl FromStr for ContentTrack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technical" => Ok(ContentTrack::Technical),
            "ad" => Ok(ContentTrack::Ad),
            other => Err(format!(
                "Invalid content type '{other}'. Must be one of: technical, ad"
            )),
        }
    }
}

/// Identifies a deadline step; stored as `deadline_type` in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineType {
    Client,
    SendToEdition,
    Edition,
    ChangesCommercial,
    ChangesPostSale,
    ClientPostSale,
}

impl DeadlineType {
    pub const ALL: [DeadlineType; 6] = [
        DeadlineType::Client,
        DeadlineType::SendToEdition,
        DeadlineType::Edition,
        DeadlineType::ChangesCommercial,
        DeadlineType::ChangesPostSale,
        DeadlineType::ClientPostSale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DeadlineType::Client => "client",
            DeadlineType::SendToEdition => "send_to_edition",
            DeadlineType::Edition => "edition",
            DeadlineType::ChangesCommercial => "changes_commercial",
            DeadlineType::ChangesPostSale => "changes_post_sale",
            DeadlineType::ClientPostSale => "client_post_sale",
        }
    }
}

impl fmt::Display for DeadlineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeadlineType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeadlineType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("Invalid deadline type '{s}'"))
    }
}

/// The role responsible for confirming a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Responsible {
    #[serde(rename = "comercial")]
    Comercial,
    #[serde(rename = "post-venta")]
    PostVenta,
}

impl Responsible {
    pub fn role_name(self) -> &'static str {
        match self {
            Responsible::Comercial => ROLE_COMERCIAL,
            Responsible::PostVenta => ROLE_POST_VENTA,
        }
    }
}

/// One named point in a track's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeadlineStep {
    pub deadline_type: DeadlineType,
    pub label: &'static str,
    /// `None` means only administrators may confirm the step.
    pub responsible: Option<Responsible>,
    pub requires_link: bool,
    pub date_key: DateKey,
    pub depends_on: Option<DeadlineType>,
}

const TECHNICAL_STEPS: &[DeadlineStep] = &[
    DeadlineStep {
        deadline_type: DeadlineType::Client,
        label: "Cliente inicial",
        responsible: Some(Responsible::Comercial),
        requires_link: false,
        date_key: DateKey::ClientInitial,
        depends_on: None,
    },
    DeadlineStep {
        deadline_type: DeadlineType::SendToEdition,
        label: "Envío a edición",
        responsible: Some(Responsible::PostVenta),
        requires_link: true,
        date_key: DateKey::SendToEdition,
        depends_on: None,
    },
    DeadlineStep {
        deadline_type: DeadlineType::Edition,
        label: "Edición",
        responsible: Some(Responsible::PostVenta),
        requires_link: false,
        date_key: DateKey::EditionEnd,
        depends_on: None,
    },
    DeadlineStep {
        deadline_type: DeadlineType::ChangesCommercial,
        label: "Cambios cliente - Comercial",
        responsible: Some(Responsible::Comercial),
        requires_link: false,
        date_key: DateKey::ClientChanges,
        depends_on: None,
    },
    DeadlineStep {
        deadline_type: DeadlineType::ChangesPostSale,
        label: "Link publicación Web",
        responsible: Some(Responsible::PostVenta),
        requires_link: true,
        date_key: DateKey::ClientChanges,
        depends_on: None,
    },
];

const AD_STEPS: &[DeadlineStep] = &[
    DeadlineStep {
        deadline_type: DeadlineType::Client,
        label: "Cliente - Comercial",
        responsible: Some(Responsible::Comercial),
        requires_link: false,
        date_key: DateKey::AdClient,
        depends_on: None,
    },
    DeadlineStep {
        deadline_type: DeadlineType::ClientPostSale,
        label: "Cliente - Post-venta",
        responsible: Some(Responsible::PostVenta),
        requires_link: false,
        date_key: DateKey::AdClient,
        depends_on: Some(DeadlineType::Client),
    },
];

/// Ordered, non-empty step list for a track.
pub fn steps_for(track: ContentTrack) -> &'static [DeadlineStep] {
    match track {
        ContentTrack::Technical => TECHNICAL_STEPS,
        ContentTrack::Ad => AD_STEPS,
    }
}

/// Find a track's step by type.
pub fn find_step(track: ContentTrack, deadline_type: DeadlineType) -> Option<&'static DeadlineStep> {
    steps_for(track)
        .iter()
        .find(|step| step.deadline_type == deadline_type)
}
