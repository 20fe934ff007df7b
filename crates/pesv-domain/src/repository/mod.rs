//! Repository trait definitions for data persistence

use chrono::{DateTime, Utc};
use pesv_types::{
    AnswerId, CompanyId, DriverQuestionId, MissionId, Result, SegmentId, SizeId,
    VehicleQuestionId,
};

use crate::model::{
    Catalog, Ciiu, Company, CompanyDraft, CompanySize, DriverAnswer, DriverQuestion, FleetAnswer,
    FleetCounts, Mission, Segment, SizeCriterion, VehicleQuestion,
};

/// Reference data: missions, sizes, criteria and questionnaires
pub trait CatalogRepository {
    /// Snapshot of every reference table
    fn catalog(&self) -> Result<Catalog>;

    /// Replace all reference tables at once
    fn replace_catalog(&self, catalog: Catalog) -> Result<()>;

    fn find_mission(&self, id: MissionId) -> Result<Option<Mission>> {
        Ok(self.catalog()?.mission(id).cloned())
    }

    fn find_segment(&self, id: SegmentId) -> Result<Option<Segment>> {
        Ok(self.catalog()?.segment(id).cloned())
    }

    fn find_size(&self, id: SizeId) -> Result<Option<CompanySize>> {
        Ok(self.catalog()?.size(id).cloned())
    }

    /// Size criteria configured for a mission
    fn criteria_for_mission(&self, mission: MissionId) -> Result<Vec<SizeCriterion>> {
        Ok(self.catalog()?.criteria_for_mission(mission))
    }

    fn vehicle_questions(&self) -> Result<Vec<VehicleQuestion>> {
        Ok(self.catalog()?.vehicle_questions)
    }

    fn driver_questions(&self) -> Result<Vec<DriverQuestion>> {
        Ok(self.catalog()?.driver_questions)
    }

    fn find_ciius(&self, fragment: &str) -> Result<Vec<Ciiu>> {
        Ok(self.catalog()?.search_ciius(fragment))
    }
}

/// Company records, soft-deleted ones included
pub trait CompanyRepository {
    /// Store a new company and assign its id
    fn insert(&self, draft: CompanyDraft, now: DateTime<Utc>) -> Result<Company>;

    /// Overwrite an existing company
    fn update(&self, company: &Company) -> Result<()>;

    fn find_by_id(&self, id: CompanyId) -> Result<Option<Company>>;

    fn find_all(&self) -> Result<Vec<Company>>;

    fn find_by_nit(&self, nit: &str) -> Result<Option<Company>> {
        Ok(self.find_all()?.into_iter().find(|c| c.nit == nit))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Company>> {
        Ok(self.find_all()?.into_iter().find(|c| c.name == name))
    }
}

/// Read access to a company's committed answers
pub trait AnswerRepository {
    fn fleet_answers(&self, company: CompanyId) -> Result<Vec<FleetAnswer>>;

    fn driver_answers(&self, company: CompanyId) -> Result<Vec<DriverAnswer>>;
}

/// Whether a find-or-create upsert inserted a new row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created(AnswerId),
    Updated(AnswerId),
}

impl Upsert {
    pub fn id(self) -> AnswerId {
        match self {
            Upsert::Created(id) | Upsert::Updated(id) => id,
        }
    }
}

/// Staged writes of one sizing submission
///
/// Nothing is visible to other readers until `commit`. Dropping the
/// transaction discards everything staged.
pub trait SizingTransaction {
    /// Find the (company, question) fleet row and replace its counts, or create it
    fn upsert_fleet_answer(
        &mut self,
        company: CompanyId,
        question: VehicleQuestionId,
        counts: FleetCounts,
    ) -> Result<Upsert>;

    /// Find the (company, question) driver row and replace its quantity, or create it
    fn upsert_driver_answer(
        &mut self,
        company: CompanyId,
        question: DriverQuestionId,
        quantity: u64,
    ) -> Result<Upsert>;

    /// Committed fleet rows of the company overlaid with staged upserts
    fn fleet_answers(&self, company: CompanyId) -> Result<Vec<FleetAnswer>>;

    /// Committed driver rows of the company overlaid with staged upserts
    fn driver_answers(&self, company: CompanyId) -> Result<Vec<DriverAnswer>>;

    /// Stage a full replacement of a company record
    fn stage_company(&mut self, company: Company) -> Result<()>;

    /// Write everything staged in one step
    fn commit(self) -> Result<()>;
}

/// Source of sizing transactions
pub trait UnitOfWork {
    type Transaction<'a>: SizingTransaction
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Transaction<'_>>;
}
