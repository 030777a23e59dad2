//! Farm selection models
//!
//! Every categorical input is a closed set whose labels are the exact strings
//! the model saw during training. The labels double as the serde and form
//! representation, so a value that parses is a value the model knows about.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Categorical inputs of the model, in the order they are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Taluka,
    Season,
    CaneVariety,
    SoilType,
    IrrigationMethod,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 5] = [
        CategoricalField::Taluka,
        CategoricalField::Season,
        CategoricalField::CaneVariety,
        CategoricalField::SoilType,
        CategoricalField::IrrigationMethod,
    ];

    /// Field name used as the one-hot column prefix
    pub fn column_prefix(&self) -> &'static str {
        match self {
            CategoricalField::Taluka => "Taluka",
            CategoricalField::Season => "Season",
            CategoricalField::CaneVariety => "Cane_Variety",
            CategoricalField::SoilType => "Soil_Type",
            CategoricalField::IrrigationMethod => "Irrigation_Method",
        }
    }

    /// Human readable label for form controls
    pub fn display_name(&self) -> &'static str {
        match self {
            CategoricalField::Taluka => "Taluka (Location)",
            CategoricalField::Season => "Season",
            CategoricalField::CaneVariety => "Cane Variety",
            CategoricalField::SoilType => "Soil Type",
            CategoricalField::IrrigationMethod => "Irrigation Method",
        }
    }

    /// Form field name
    pub fn form_name(&self) -> &'static str {
        match self {
            CategoricalField::Taluka => "taluka",
            CategoricalField::Season => "season",
            CategoricalField::CaneVariety => "variety",
            CategoricalField::SoilType => "soil_type",
            CategoricalField::IrrigationMethod => "irrigation",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_prefix())
    }
}

/// A closed set of choices offered by the form
pub trait Choice: Copy + Sized + 'static {
    const FIELD: CategoricalField;
    const ALL: &'static [Self];

    /// Training-time label of the choice
    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.label()).collect()
    }
}

/// A value outside the closed set of a categorical field
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {field}")]
pub struct InvalidChoice {
    pub field: CategoricalField,
    pub value: String,
}

fn parse_choice<T: Choice>(s: &str) -> Result<T, InvalidChoice> {
    T::from_label(s).ok_or_else(|| InvalidChoice {
        field: T::FIELD,
        value: s.to_string(),
    })
}

/// Planting season
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Season {
    Suru,
    #[serde(rename = "Pre-seasonal")]
    PreSeasonal,
    Adsali,
}

impl Choice for Season {
    const FIELD: CategoricalField = CategoricalField::Season;
    const ALL: &'static [Self] = &[Season::Suru, Season::PreSeasonal, Season::Adsali];

    fn label(&self) -> &'static str {
        match self {
            Season::Suru => "Suru",
            Season::PreSeasonal => "Pre-seasonal",
            Season::Adsali => "Adsali",
        }
    }
}

/// Sugarcane varieties the model was trained on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CaneVariety {
    #[serde(rename = "CoM 0265")]
    CoM0265,
    #[serde(rename = "Co 86032")]
    Co86032,
    #[serde(rename = "Co 92005")]
    Co92005,
    #[serde(rename = "VSI 434")]
    Vsi434,
}

impl Choice for CaneVariety {
    const FIELD: CategoricalField = CategoricalField::CaneVariety;
    const ALL: &'static [Self] = &[
        CaneVariety::CoM0265,
        CaneVariety::Co86032,
        CaneVariety::Co92005,
        CaneVariety::Vsi434,
    ];

    fn label(&self) -> &'static str {
        match self {
            CaneVariety::CoM0265 => "CoM 0265",
            CaneVariety::Co86032 => "Co 86032",
            CaneVariety::Co92005 => "Co 92005",
            CaneVariety::Vsi434 => "VSI 434",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SoilType {
    #[serde(rename = "Black Cotton")]
    BlackCotton,
    #[serde(rename = "Clay Loam")]
    ClayLoam,
    #[serde(rename = "Sandy Loam")]
    SandyLoam,
    #[serde(rename = "Medium Black")]
    MediumBlack,
}

impl Choice for SoilType {
    const FIELD: CategoricalField = CategoricalField::SoilType;
    const ALL: &'static [Self] = &[
        SoilType::BlackCotton,
        SoilType::ClayLoam,
        SoilType::SandyLoam,
        SoilType::MediumBlack,
    ];

    fn label(&self) -> &'static str {
        match self {
            SoilType::BlackCotton => "Black Cotton",
            SoilType::ClayLoam => "Clay Loam",
            SoilType::SandyLoam => "Sandy Loam",
            SoilType::MediumBlack => "Medium Black",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum IrrigationMethod {
    Drip,
    Flood,
    Rainfed,
}

impl Choice for IrrigationMethod {
    const FIELD: CategoricalField = CategoricalField::IrrigationMethod;
    const ALL: &'static [Self] = &[
        IrrigationMethod::Drip,
        IrrigationMethod::Flood,
        IrrigationMethod::Rainfed,
    ];

    fn label(&self) -> &'static str {
        match self {
            IrrigationMethod::Drip => "Drip",
            IrrigationMethod::Flood => "Flood",
            IrrigationMethod::Rainfed => "Rainfed",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for CaneVariety {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SoilType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for IrrigationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for CaneVariety {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for SoilType {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for IrrigationMethod {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

/// Farm details collected from one form submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FarmSelection {
    pub taluka: String,
    pub season: Season,
    pub variety: CaneVariety,
    pub soil_type: SoilType,
    pub irrigation: IrrigationMethod,
}

impl FarmSelection {
    /// Selection pre-filled with the first choice of every closed set
    pub fn first_choices(taluka: impl Into<String>) -> Self {
        Self {
            taluka: taluka.into(),
            season: Season::Suru,
            variety: CaneVariety::CoM0265,
            soil_type: SoilType::BlackCotton,
            irrigation: IrrigationMethod::Drip,
        }
    }

    /// Selected label of every categorical field, in encoding order
    pub fn categorical_values(&self) -> [(CategoricalField, &str); 5] {
        [
            (CategoricalField::Taluka, self.taluka.as_str()),
            (CategoricalField::Season, self.season.label()),
            (CategoricalField::CaneVariety, self.variety.label()),
            (CategoricalField::SoilType, self.soil_type.label()),
            (CategoricalField::IrrigationMethod, self.irrigation.label()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_match_training_strings() {
        assert_eq!(Season::labels(), vec!["Suru", "Pre-seasonal", "Adsali"]);
        assert_eq!(
            CaneVariety::labels(),
            vec!["CoM 0265", "Co 86032", "Co 92005", "VSI 434"]
        );
        assert_eq!(
            SoilType::labels(),
            vec!["Black Cotton", "Clay Loam", "Sandy Loam", "Medium Black"]
        );
        assert_eq!(IrrigationMethod::labels(), vec!["Drip", "Flood", "Rainfed"]);
    }

    #[test]
    fn test_from_str_accepts_labels_only() {
        assert_eq!("Pre-seasonal".parse::<Season>(), Ok(Season::PreSeasonal));
        assert_eq!("VSI 434".parse::<CaneVariety>(), Ok(CaneVariety::Vsi434));

        let err = "PreSeasonal".parse::<Season>().unwrap_err();
        assert_eq!(err.field, CategoricalField::Season);
        assert_eq!(err.to_string(), "'PreSeasonal' is not a valid Season");
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&SoilType::MediumBlack).unwrap();
        assert_eq!(json, "\"Medium Black\"");

        let variety: CaneVariety = serde_json::from_str("\"Co 86032\"").unwrap();
        assert_eq!(variety, CaneVariety::Co86032);
    }

    #[test]
    fn test_categorical_values_order() {
        let selection = FarmSelection {
            taluka: "Karad".to_string(),
            season: Season::Adsali,
            variety: CaneVariety::Co92005,
            soil_type: SoilType::ClayLoam,
            irrigation: IrrigationMethod::Flood,
        };

        let values = selection.categorical_values();
        let fields: Vec<CategoricalField> = values.iter().map(|(f, _)| *f).collect();
        assert_eq!(fields, CategoricalField::ALL.to_vec());
        assert_eq!(values[0].1, "Karad");
        assert_eq!(values[2].1, "Co 92005");
    }
}
