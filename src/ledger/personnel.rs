use tracing::{debug, info};

use crate::domain::{Document, Personnel};
use crate::error::LedgerError;
use crate::state::Stub;

use super::{require_present, PersonnelLedger, StateAccessExt, WriteBatch};

impl<S: Stub + ?Sized> PersonnelLedger<'_, S> {
    /// Read one personnel record.
    pub fn get_personnel(&self, personnel_id: &str) -> Result<Personnel, LedgerError> {
        debug!(personnel_id, "reading personnel");
        self.stub.documents::<Personnel>().require(personnel_id)
    }

    /// Enroll a new active cadet. Fails if the id is already taken.
    pub fn enroll_cadet(
        &mut self,
        personnel_id: &str,
        name: &str,
        campus: &str,
    ) -> Result<Personnel, LedgerError> {
        require_present(&[
            ("personnelID", personnel_id),
            ("name", name),
            ("campus", campus),
        ])?;

        match self.get_personnel(personnel_id) {
            Ok(_) => {
                return Err(LedgerError::AlreadyExists {
                    doc_type: Personnel::DOC_TYPE,
                    id: personnel_id.to_string(),
                })
            }
            Err(LedgerError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let personnel = Personnel::cadet(personnel_id, name, campus);
        WriteBatch::new().document(&personnel)?.apply(&mut *self.stub)?;

        info!(
            tx_id = self.stub.tx_id(),
            personnel_id,
            campus,
            "cadet enrolled"
        );
        Ok(personnel)
    }
}
