//! Item lifecycle status and the transitions offered for it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a listed item.
///
/// Unrecognised wire values are kept as `Other` so they round-trip and can be
/// treated as terminal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    Available,
    Reserved,
    SoldOrDonated,
    Other(String),
}

impl ItemStatus {
    pub fn as_wire(&self) -> &str {
        match self {
            ItemStatus::Available => "DISPONIVEL",
            ItemStatus::Reserved => "RESERVADO",
            ItemStatus::SoldOrDonated => "DOADO_VENDIDO",
            ItemStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ItemStatus::Available => "Disponível",
            ItemStatus::Reserved => "Reservado",
            ItemStatus::SoldOrDonated => "Doado/Vendido",
            ItemStatus::Other(raw) => raw,
        }
    }

    /// Statuses selectable from this one, current status first.
    ///
    /// Sold/donated and unknown statuses only offer themselves.
    pub fn selectable_targets(&self) -> Vec<ItemStatus> {
        match self {
            ItemStatus::Available => vec![
                ItemStatus::Available,
                ItemStatus::Reserved,
                ItemStatus::SoldOrDonated,
            ],
            ItemStatus::Reserved => vec![
                ItemStatus::Reserved,
                ItemStatus::Available,
                ItemStatus::SoldOrDonated,
            ],
            other => vec![other.clone()],
        }
    }

    pub fn can_select(&self, target: &ItemStatus) -> bool {
        self.selectable_targets().contains(target)
    }

    pub fn is_terminal(&self) -> bool {
        self.selectable_targets().len() == 1
    }
}

impl From<String> for ItemStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "DISPONIVEL" => ItemStatus::Available,
            "RESERVADO" => ItemStatus::Reserved,
            "DOADO_VENDIDO" => ItemStatus::SoldOrDonated,
            _ => ItemStatus::Other(raw),
        }
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Other(raw) => raw,
            known => known.as_wire().to_string(),
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Parses wire names and the short aliases accepted on the command line.
impl FromStr for ItemStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disponivel" | "available" => Ok(ItemStatus::Available),
            "reservado" | "reserved" => Ok(ItemStatus::Reserved),
            "doado_vendido" | "sold" | "donated" | "sold_or_donated" => {
                Ok(ItemStatus::SoldOrDonated)
            }
            _ => Err(format!(
                "unknown status '{}' (expected available, reserved or sold)",
                s
            )),
        }
    }
}
