use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};
use crate::store::TableRegistry;
use crate::types::Table;

/// Finds a free table seating `party_size` and reserves it.
///
/// The chosen table is the lowest-id free table with enough capacity. It is
/// `Occupied` by the time this returns, so a concurrent locate can never
/// receive the same table.
///
/// ## Errors
/// - `NoTableAvailable` when every fitting table is taken
pub async fn locate<R>(tables: &R, party_size: u32) -> CoreResult<Table>
where
    R: TableRegistry + ?Sized,
{
    match tables.claim_free_table(party_size).await? {
        Some(table) => {
            info!(table_id = table.id, capacity = table.capacity, party_size, "Table located");
            Ok(table)
        }
        None => {
            warn!(party_size, "No free table");
            Err(CoreError::NoTableAvailable { party_size })
        }
    }
}
