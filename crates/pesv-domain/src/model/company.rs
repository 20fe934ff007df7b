//! Company record and its diagnosis workflow marker

use chrono::{DateTime, Utc};
use pesv_types::{CompanyId, MissionId, SegmentId, SizeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a company through the diagnosis workflow
///
/// Stored as its integer code. Sizing only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DiagnosisStep {
    #[default]
    Unsized,
    Sized,
}

impl DiagnosisStep {
    pub fn code(self) -> u8 {
        match self {
            DiagnosisStep::Unsized => 0,
            DiagnosisStep::Sized => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DiagnosisStep::Unsized => "unsized",
            DiagnosisStep::Sized => "sized",
        }
    }
}

impl From<DiagnosisStep> for u8 {
    fn from(step: DiagnosisStep) -> Self {
        step.code()
    }
}

impl TryFrom<u8> for DiagnosisStep {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(DiagnosisStep::Unsized),
            1 => Ok(DiagnosisStep::Sized),
            other => Err(format!("unknown diagnosis step: {}", other)),
        }
    }
}

impl fmt::Display for DiagnosisStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    /// Tax identification number
    pub nit: String,
    #[serde(default)]
    pub segment_id: Option<SegmentId>,
    #[serde(default)]
    pub mission_id: Option<MissionId>,
    #[serde(default)]
    pub dependant: Option<String>,
    #[serde(default)]
    pub dependant_position: Option<String>,
    #[serde(default)]
    pub dependant_phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub activities_ciiu: Option<String>,
    /// CIIU activity codes, each present in the catalog
    #[serde(default)]
    pub ciius: Vec<String>,
    #[serde(default)]
    pub acquired_certification: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
    /// Cached size classification, None until the first successful sizing
    #[serde(default)]
    pub size_id: Option<SizeId>,
    #[serde(default)]
    pub diagnosis_step: DiagnosisStep,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Company {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Record a successful size classification
    pub fn mark_sized(&mut self, size: SizeId, now: DateTime<Utc>) {
        self.size_id = Some(size);
        self.diagnosis_step = self.diagnosis_step.max(DiagnosisStep::Sized);
        self.updated_at = now;
    }

    /// Apply a partial update of descriptive fields
    pub fn apply_patch(&mut self, patch: CompanyPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(nit) = patch.nit {
            self.nit = nit;
        }
        if let Some(segment) = patch.segment_id {
            self.segment_id = Some(segment);
        }
        if let Some(mission) = patch.mission_id {
            self.mission_id = Some(mission);
        }
        merge_text(&mut self.dependant, patch.dependant);
        merge_text(&mut self.dependant_position, patch.dependant_position);
        merge_text(&mut self.dependant_phone, patch.dependant_phone);
        merge_text(&mut self.email, patch.email);
        merge_text(&mut self.activities_ciiu, patch.activities_ciiu);
        if let Some(codes) = patch.ciius {
            self.ciius = normalize_codes(codes);
        }
        merge_text(&mut self.acquired_certification, patch.acquired_certification);
        merge_text(&mut self.diagnosis, patch.diagnosis);
        self.updated_at = now;
    }
}

/// A provided value replaces the field; blank text clears it.
fn merge_text(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *field = blank_to_none(Some(value));
    }
}

/// Treat empty or whitespace-only text as absent
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Trim codes, drop blanks and repeats, keep first-seen order
pub fn normalize_codes(codes: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(codes.len());
    for code in codes {
        let code = code.trim();
        if !code.is_empty() && !out.iter().any(|c| c == code) {
            out.push(code.to_string());
        }
    }
    out
}

/// Fields required to register a new company
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyDraft {
    pub name: String,
    pub nit: String,
    #[serde(default)]
    pub segment_id: Option<SegmentId>,
    #[serde(default)]
    pub mission_id: Option<MissionId>,
    #[serde(default)]
    pub dependant: Option<String>,
    #[serde(default)]
    pub dependant_position: Option<String>,
    #[serde(default)]
    pub dependant_phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub activities_ciiu: Option<String>,
    #[serde(default)]
    pub ciius: Vec<String>,
    #[serde(default)]
    pub acquired_certification: Option<String>,
}

impl CompanyDraft {
    pub fn new(name: impl Into<String>, nit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nit: nit.into(),
            ..Default::default()
        }
    }

    pub fn with_mission(mut self, mission: MissionId) -> Self {
        self.mission_id = Some(mission);
        self
    }

    pub fn with_segment(mut self, segment: SegmentId) -> Self {
        self.segment_id = Some(segment);
        self
    }

    pub fn with_ciius<I, C>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        self.ciius = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Trim text and turn blank optional fields into None
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            nit: self.nit.trim().to_string(),
            segment_id: self.segment_id,
            mission_id: self.mission_id,
            dependant: blank_to_none(self.dependant),
            dependant_position: blank_to_none(self.dependant_position),
            dependant_phone: blank_to_none(self.dependant_phone),
            email: blank_to_none(self.email),
            activities_ciiu: blank_to_none(self.activities_ciiu),
            ciius: normalize_codes(self.ciius),
            acquired_certification: blank_to_none(self.acquired_certification),
        }
    }

    pub fn into_company(self, id: CompanyId, now: DateTime<Utc>) -> Company {
        Company {
            id,
            name: self.name,
            nit: self.nit,
            segment_id: self.segment_id,
            mission_id: self.mission_id,
            dependant: self.dependant,
            dependant_position: self.dependant_position,
            dependant_phone: self.dependant_phone,
            email: self.email,
            activities_ciiu: self.activities_ciiu,
            ciius: self.ciius,
            acquired_certification: self.acquired_certification,
            diagnosis: None,
            size_id: None,
            diagnosis_step: DiagnosisStep::Unsized,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Partial update; None leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nit: Option<String>,
    #[serde(default)]
    pub segment_id: Option<SegmentId>,
    #[serde(default)]
    pub mission_id: Option<MissionId>,
    #[serde(default)]
    pub dependant: Option<String>,
    #[serde(default)]
    pub dependant_position: Option<String>,
    #[serde(default)]
    pub dependant_phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub activities_ciiu: Option<String>,
    /// Replaces the whole code list when present
    #[serde(default)]
    pub ciius: Option<Vec<String>>,
    #[serde(default)]
    pub acquired_certification: Option<String>,
    #[serde(default)]
    pub diagnosis: Option<String>,
}

impl CompanyPatch {
    pub fn is_empty(&self) -> bool {
        *self == CompanyPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company() -> Company {
        CompanyDraft::new("Transportes Andinos", "900123456")
            .into_company(CompanyId(1), Utc::now())
    }

    #[test]
    fn test_new_company_is_unsized() {
        let c = company();
        assert_eq!(c.diagnosis_step, DiagnosisStep::Unsized);
        assert!(c.size_id.is_none());
        assert!(!c.is_deleted());
    }

    #[test]
    fn test_mark_sized_advances_step() {
        let mut c = company();
        c.mark_sized(SizeId(2), Utc::now());
        assert_eq!(c.size_id, Some(SizeId(2)));
        assert_eq!(c.diagnosis_step, DiagnosisStep::Sized);

        c.mark_sized(SizeId(3), Utc::now());
        assert_eq!(c.size_id, Some(SizeId(3)));
        assert_eq!(c.diagnosis_step, DiagnosisStep::Sized);
    }

    #[test]
    fn test_step_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&DiagnosisStep::Sized).unwrap(), "1");
        let step: DiagnosisStep = serde_json::from_str("0").unwrap();
        assert_eq!(step, DiagnosisStep::Unsized);
        assert!(serde_json::from_str::<DiagnosisStep>("7").is_err());
    }

    #[test]
    fn test_draft_normalization_blanks_to_none() {
        let mut draft = CompanyDraft::new("  Acme ", " 800 ");
        draft.dependant_phone = Some("   ".to_string());
        draft.dependant_position = Some(" Gerente ".to_string());
        let draft = draft.normalized();
        assert_eq!(draft.name, "Acme");
        assert_eq!(draft.nit, "800");
        assert_eq!(draft.dependant_phone, None);
        assert_eq!(draft.dependant_position, Some("Gerente".to_string()));
    }

    #[test]
    fn test_patch_clears_blank_text() {
        let mut c = company();
        c.email = Some("a@b.co".to_string());
        let patch = CompanyPatch {
            email: Some(String::new()),
            dependant: Some("Laura".to_string()),
            ..Default::default()
        };
        c.apply_patch(patch, Utc::now());
        assert_eq!(c.email, None);
        assert_eq!(c.dependant, Some("Laura".to_string()));
        assert_eq!(c.name, "Transportes Andinos");
    }

    #[test]
    fn test_ciiu_codes_trimmed_and_deduplicated() {
        let draft = CompanyDraft::new("Acme", "800")
            .with_ciius([" 4923", "4923", "", "5210 "])
            .normalized();
        assert_eq!(draft.ciius, vec!["4923".to_string(), "5210".to_string()]);

        let mut c = draft.into_company(CompanyId(1), Utc::now());
        c.apply_patch(CompanyPatch { ciius: Some(vec![]), ..Default::default() }, Utc::now());
        assert!(c.ciius.is_empty());
    }
}
