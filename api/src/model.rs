use serde::Serialize;

use crate::error::ApiError;
use crate::schema::PredictionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupation {
    Engineer,
    Doctor,
    Journalist,
    HrManager,
    WebDeveloper,
    SecurityGuard,
    Pharmacist,
    PoliceOfficer,
    Nurse,
    TruckDriver,
    Plumber,
    FactoryWorker,
    Unknown,
}

impl Occupation {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Engineer" => Self::Engineer,
            "Doctor" => Self::Doctor,
            "Journalist" => Self::Journalist,
            "HR manager" => Self::HrManager,
            "Web developer" => Self::WebDeveloper,
            "Security guard" => Self::SecurityGuard,
            "Pharmacist" => Self::Pharmacist,
            "Police officer" => Self::PoliceOfficer,
            "Nurse" => Self::Nurse,
            "Truck driver" => Self::TruckDriver,
            "Plumber" => Self::Plumber,
            "Factory worker" => Self::FactoryWorker,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> Option<u8> {
        let code = match self {
            Self::Engineer => 0,
            Self::Doctor => 1,
            Self::Journalist => 2,
            Self::HrManager => 3,
            Self::WebDeveloper => 4,
            Self::SecurityGuard => 5,
            Self::Pharmacist => 6,
            Self::PoliceOfficer => 7,
            Self::Nurse => 8,
            Self::TruckDriver => 9,
            Self::Plumber => 10,
            Self::FactoryWorker => 11,
            Self::Unknown => return None,
        };
        Some(code)
    }
}

/// Three-step scale shared by `physical_activity` and `stress_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Normal,
    High,
    Unknown,
}

impl Level {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Low" => Self::Low,
            "Normal" => Self::Normal,
            "High" => Self::High,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> Option<u8> {
        match self {
            Self::Low => Some(0),
            Self::Normal => Some(1),
            Self::High => Some(2),
            Self::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Athlete {
    Yes,
    No,
    Unknown,
}

impl Athlete {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Yes" => Self::Yes,
            "No" => Self::No,
            _ => Self::Unknown,
        }
    }

    pub fn code(self) -> Option<u8> {
        match self {
            Self::Yes => Some(0),
            Self::No => Some(1),
            Self::Unknown => None,
        }
    }
}

/// Body mass index from height in centimeters and weight in kilograms.
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Model input, in the column order the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub occupation: f64,
    pub age: f64,
    pub sleep_duration: f64,
    pub heart_rate: f64,
    pub physical_activity: f64,
    pub stress_level: f64,
    pub athlete: f64,
    pub bmi: f64,
}

impl FeatureVector {
    pub const LEN: usize = 8;

    /// Encodes a request, failing if any categorical field is outside its
    /// lookup table.
    pub fn encode(req: &PredictionRequest) -> Result<Self, ApiError> {
        let bmi = bmi(req.height, req.weight);

        let (Some(occupation), Some(physical_activity), Some(stress_level), Some(athlete)) = (
            req.occupation.code(),
            req.physical_activity.code(),
            req.stress_level.code(),
            req.athlete.code(),
        ) else {
            return Err(ApiError::InvalidCategory);
        };

        Ok(Self {
            occupation: f64::from(occupation),
            age: req.age as f64,
            sleep_duration: req.sleep_duration,
            heart_rate: req.heart_rate,
            physical_activity: f64::from(physical_activity),
            stress_level: f64::from(stress_level),
            athlete: f64::from(athlete),
            bmi,
        })
    }

    pub fn as_array(&self) -> [f64; Self::LEN] {
        [
            self.occupation,
            self.age,
            self.sleep_duration,
            self.heart_rate,
            self.physical_activity,
            self.stress_level,
            self.athlete,
            self.bmi,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SleepQuality {
    Good,
    Bad,
    Unknown,
}

impl SleepQuality {
    pub fn from_class_index(index: i64) -> Self {
        match index {
            0 => Self::Good,
            1 => Self::Bad,
            _ => Self::Unknown,
        }
    }
}
