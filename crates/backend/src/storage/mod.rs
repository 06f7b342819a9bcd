use hunterdash_shared::models::{Marker, MarkerId, MarkerUpdate};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;
use std::sync::Arc;

const MARKERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("markers");

pub struct Storage {
    db: Database,
}

impl Storage {
    pub fn open(path: &Path) -> Result<Arc<Self>, String> {
        let db = Database::create(path)
            .map_err(|e| format!("Failed to open database at {}: {}", path.display(), e))?;

        // Ensure table exists
        let write_txn = db.begin_write().map_err(|e| e.to_string())?;
        {
            write_txn.open_table(MARKERS_TABLE).map_err(|e| e.to_string())?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;

        Ok(Arc::new(Storage { db }))
    }

    pub fn save_marker(&self, marker: &Marker) -> Result<(), String> {
        let json = serde_json::to_vec(marker).map_err(|e| e.to_string())?;

        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        {
            let mut table = write_txn.open_table(MARKERS_TABLE).map_err(|e| e.to_string())?;
            table
                .insert(marker.id.as_str(), json.as_slice())
                .map_err(|e| e.to_string())?;
        }
        write_txn.commit().map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn get_marker(&self, id: &MarkerId) -> Result<Option<Marker>, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn.open_table(MARKERS_TABLE).map_err(|e| e.to_string())?;

        match table.get(id.as_str()).map_err(|e| e.to_string())? {
            Some(value) => {
                let marker = serde_json::from_slice(value.value()).map_err(|e| e.to_string())?;
                Ok(Some(marker))
            }
            None => Ok(None),
        }
    }

    /// Apply a partial update in one write transaction.
    ///
    /// `Ok(None)` when the marker does not exist; nothing is written then.
    pub fn update_marker(
        &self,
        id: &MarkerId,
        update: MarkerUpdate,
    ) -> Result<Option<Marker>, String> {
        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        let updated = {
            let mut table = write_txn.open_table(MARKERS_TABLE).map_err(|e| e.to_string())?;
            let stored = match table.get(id.as_str()).map_err(|e| e.to_string())? {
                Some(value) => {
                    Some(serde_json::from_slice::<Marker>(value.value()).map_err(|e| e.to_string())?)
                }
                None => None,
            };
            match stored {
                Some(mut marker) => {
                    update.apply_to(&mut marker);
                    let json = serde_json::to_vec(&marker).map_err(|e| e.to_string())?;
                    table
                        .insert(id.as_str(), json.as_slice())
                        .map_err(|e| e.to_string())?;
                    Some(marker)
                }
                None => None,
            }
        };
        match updated {
            Some(marker) => {
                write_txn.commit().map_err(|e| e.to_string())?;
                Ok(Some(marker))
            }
            None => {
                write_txn.abort().map_err(|e| e.to_string())?;
                Ok(None)
            }
        }
    }

    /// All markers, oldest first. Rows that no longer parse are skipped.
    pub fn list_markers(&self) -> Result<Vec<Marker>, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn.open_table(MARKERS_TABLE).map_err(|e| e.to_string())?;

        let mut markers = Vec::new();
        for entry in table.iter().map_err(|e| e.to_string())? {
            let (key, value) = entry.map_err(|e| e.to_string())?;
            match serde_json::from_slice::<Marker>(value.value()) {
                Ok(marker) => markers.push(marker),
                Err(e) => tracing::warn!(marker_id = key.value(), error = %e, "skipping unreadable marker"),
            }
        }
        // RFC 3339 strings in one offset sort chronologically.
        markers.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(markers)
    }

    pub fn count_markers(&self) -> Result<u64, String> {
        let read_txn = self.db.begin_read().map_err(|e| e.to_string())?;
        let table = read_txn.open_table(MARKERS_TABLE).map_err(|e| e.to_string())?;
        table.len().map_err(|e| e.to_string())
    }

    pub fn delete_marker(&self, id: &MarkerId) -> Result<bool, String> {
        let write_txn = self.db.begin_write().map_err(|e| e.to_string())?;
        let removed = {
            let mut table = write_txn.open_table(MARKERS_TABLE).map_err(|e| e.to_string())?;
            let result = table.remove(id.as_str()).map_err(|e| e.to_string())?;
            result.is_some()
        };
        write_txn.commit().map_err(|e| e.to_string())?;
        Ok(removed)
    }
}
