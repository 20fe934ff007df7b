//! Staged writes over a `JsonStore`

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use pesv_domain::model::{AnswerKey, Company, DriverAnswer, FleetAnswer, FleetCounts};
use pesv_domain::repository::{SizingTransaction, Upsert};
use pesv_types::{AnswerId, CompanyId, DriverQuestionId, Error, Result, VehicleQuestionId};

use super::json_store::JsonStore;

/// Unit of work for one sizing submission
///
/// Rows are looked up by their (company, question) key first in the staged
/// set, then in the committed document. Commit applies the staged rows and
/// company records to a copy of the document and writes it in one step.
pub struct JsonStoreTransaction<'a> {
    store: &'a JsonStore,
    now: DateTime<Utc>,
    answer_seq: u64,
    fleets: BTreeMap<AnswerKey<VehicleQuestionId>, FleetAnswer>,
    drivers: BTreeMap<AnswerKey<DriverQuestionId>, DriverAnswer>,
    companies: BTreeMap<CompanyId, Company>,
}

impl<'a> JsonStoreTransaction<'a> {
    pub(crate) fn new(store: &'a JsonStore, now: DateTime<Utc>) -> Self {
        Self {
            store,
            now,
            answer_seq: store.read(|d| d.answer_seq),
            fleets: BTreeMap::new(),
            drivers: BTreeMap::new(),
            companies: BTreeMap::new(),
        }
    }

    fn next_answer_id(&mut self) -> AnswerId {
        self.answer_seq += 1;
        AnswerId(self.answer_seq)
    }

    fn is_empty(&self) -> bool {
        self.fleets.is_empty() && self.drivers.is_empty() && self.companies.is_empty()
    }
}

impl SizingTransaction for JsonStoreTransaction<'_> {
    fn upsert_fleet_answer(
        &mut self,
        company: CompanyId,
        question: VehicleQuestionId,
        counts: FleetCounts,
    ) -> Result<Upsert> {
        let key = AnswerKey::new(company, question);
        let existing = match self.fleets.get(&key) {
            Some(row) => Some(row.clone()),
            None => self.store.read(|d| d.fleet_answers.get(&key).cloned()),
        };

        let (row, outcome) = match existing {
            Some(mut row) => {
                row.counts = counts;
                row.updated_at = self.now;
                let id = row.id;
                (row, Upsert::Updated(id))
            }
            None => {
                let id = self.next_answer_id();
                let row = FleetAnswer {
                    id,
                    company_id: company,
                    question_id: question,
                    counts,
                    created_at: self.now,
                    updated_at: self.now,
                };
                (row, Upsert::Created(id))
            }
        };

        tracing::debug!(%company, %question, ?outcome, "staged fleet answer");
        self.fleets.insert(key, row);
        Ok(outcome)
    }

    fn upsert_driver_answer(
        &mut self,
        company: CompanyId,
        question: DriverQuestionId,
        quantity: u64,
    ) -> Result<Upsert> {
        let key = AnswerKey::new(company, question);
        let existing = match self.drivers.get(&key) {
            Some(row) => Some(row.clone()),
            None => self.store.read(|d| d.driver_answers.get(&key).cloned()),
        };

        let (row, outcome) = match existing {
            Some(mut row) => {
                row.quantity = quantity;
                row.updated_at = self.now;
                let id = row.id;
                (row, Upsert::Updated(id))
            }
            None => {
                let id = self.next_answer_id();
                let row = DriverAnswer {
                    id,
                    company_id: company,
                    question_id: question,
                    quantity,
                    created_at: self.now,
                    updated_at: self.now,
                };
                (row, Upsert::Created(id))
            }
        };

        tracing::debug!(%company, %question, ?outcome, "staged driver answer");
        self.drivers.insert(key, row);
        Ok(outcome)
    }

    fn fleet_answers(&self, company: CompanyId) -> Result<Vec<FleetAnswer>> {
        let mut rows: BTreeMap<_, _> = self
            .store
            .read(|d| d.fleet_answers_of(company))
            .into_iter()
            .map(|row| (row.key(), row))
            .collect();
        for (key, row) in self.fleets.iter().filter(|(k, _)| k.company_id == company) {
            rows.insert(*key, row.clone());
        }
        Ok(rows.into_values().collect())
    }

    fn driver_answers(&self, company: CompanyId) -> Result<Vec<DriverAnswer>> {
        let mut rows: BTreeMap<_, _> = self
            .store
            .read(|d| d.driver_answers_of(company))
            .into_iter()
            .map(|row| (row.key(), row))
            .collect();
        for (key, row) in self.drivers.iter().filter(|(k, _)| k.company_id == company) {
            rows.insert(*key, row.clone());
        }
        Ok(rows.into_values().collect())
    }

    fn stage_company(&mut self, company: Company) -> Result<()> {
        let known = self.companies.contains_key(&company.id)
            || self.store.read(|d| d.companies.contains_key(&company.id));
        if !known {
            return Err(Error::NotFound(format!("company {}", company.id)));
        }
        self.companies.insert(company.id, company);
        Ok(())
    }

    fn commit(self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        let mut next = self.store.snapshot();
        let (fleets, drivers, companies) =
            (self.fleets.len(), self.drivers.len(), self.companies.len());
        next.fleet_answers.extend(self.fleets);
        next.driver_answers.extend(self.drivers);
        next.companies.extend(self.companies);
        next.answer_seq = next.answer_seq.max(self.answer_seq);

        self.store.write(next)?;
        tracing::debug!(fleets, drivers, companies, "committed transaction");
        Ok(())
    }
}
