use crate::core::{
    Measurement, MeasurementRepository, NewMeasurement, Result, SearchQuery, Storage,
};
use crate::utils::error::RomError;
use async_trait::async_trait;

const HEADER: [&str; 9] = [
    "id", "name", "surname", "date", "test", "full_rom", "left", "right", "result",
];

/// Measurement repository kept as a single CSV file.
///
/// Every call reads the whole file and mutating calls rewrite it. Ids follow
/// SQLite rowid rules: a new row gets the current maximum id plus one.
pub struct CsvMeasurementStore<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> CsvMeasurementStore<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    pub fn location(&self) -> String {
        self.storage.locate(&self.file_name)
    }

    async fn load(&self) -> Result<Vec<Measurement>> {
        match self.storage.read_file(&self.file_name).await? {
            Some(bytes) => decode(&bytes),
            None => {
                tracing::debug!("Store {} does not exist yet", self.location());
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, rows: &[Measurement]) -> Result<()> {
        let data = encode(rows)?;
        self.storage.write_file(&self.file_name, &data).await?;
        tracing::debug!("Wrote {} rows to {}", rows.len(), self.location());
        Ok(())
    }
}

pub fn decode(bytes: &[u8]) -> Result<Vec<Measurement>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn encode(rows: &[Measurement]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| RomError::IoError(e.into_error()))
}

#[async_trait]
impl<S: Storage> MeasurementRepository for CsvMeasurementStore<S> {
    async fn all(&self) -> Result<Vec<Measurement>> {
        self.load().await
    }

    async fn insert_many(&self, new_rows: Vec<NewMeasurement>) -> Result<Vec<Measurement>> {
        let mut rows = self.load().await?;
        let mut next_id = rows.iter().map(|m| m.id).max().unwrap_or(0) + 1;

        let mut inserted = Vec::with_capacity(new_rows.len());
        for new in new_rows {
            let measurement = Measurement::from_new(next_id, new);
            next_id += 1;
            inserted.push(measurement);
        }

        rows.extend(inserted.iter().cloned());
        self.save(&rows).await?;
        tracing::info!("Stored {} measurements", inserted.len());
        Ok(inserted)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Measurement>> {
        let rows = self.load().await?;
        let total = rows.len();
        let found: Vec<Measurement> = rows.into_iter().filter(|m| query.matches(m)).collect();
        tracing::debug!("Search matched {} of {} measurements", found.len(), total);
        Ok(found)
    }

    async fn delete(&self, id: u64) -> Result<Measurement> {
        let mut rows = self.load().await?;
        let index = rows
            .iter()
            .position(|m| m.id == id)
            .ok_or(RomError::NotFound { id })?;
        let removed = rows.remove(index);
        self.save(&rows).await?;
        tracing::info!("Deleted entry {}", id);
        Ok(removed)
    }

    async fn delete_all(&self) -> Result<usize> {
        let rows = self.load().await?;
        self.save(&[]).await?;
        tracing::info!("Deleted all {} entries", rows.len());
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Label, Subject};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl Storage for MemoryStorage {
        async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.files.lock().unwrap().get(path).cloned())
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn locate(&self, path: &str) -> String {
            format!("memory://{}", path)
        }
    }

    fn new_row(name: &str, test: &str, left: f64, right: f64) -> NewMeasurement {
        NewMeasurement {
            subject: Subject::new(name, "Tester"),
            date: "2024-05-10".parse().unwrap(),
            test: test.to_string(),
            full_rom: Some(90.0),
            left,
            right,
            result: Label::IntactLeftLateralizedLimitedLeft,
        }
    }

    #[test]
    fn test_empty_store_reads_as_empty() {
        let store = CsvMeasurementStore::new(MemoryStorage::default(), "m.csv");
        let rows = tokio_test::block_on(store.all()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_encode_writes_header_for_empty_store() {
        let bytes = encode(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap().trim_end(),
            "id,name,surname,date,test,full_rom,left,right,result"
        );
        assert!(decode(b"id,name,surname,date,test,full_rom,left,right,result\n")
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = CsvMeasurementStore::new(MemoryStorage::default(), "m.csv");
        let first = store
            .insert_many(vec![new_row("Ada", "Hip IR", 30.0, 35.0)])
            .await
            .unwrap();
        let second = store
            .insert_many(vec![
                new_row("Ada", "Hip ER", 30.0, 35.0),
                new_row("Ada", "Hip Flexion", 60.0, 70.0),
            ])
            .await
            .unwrap();

        assert_eq!(first[0].id, 1);
        assert_eq!(second.iter().map(|m| m.id).collect::<Vec<_>>(), vec![2, 3]);

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[2].test, "Hip Flexion");
        assert_eq!(all[2].result, Label::IntactLeftLateralizedLimitedLeft);
    }

    #[tokio::test]
    async fn test_delete_missing_entry_is_not_found() {
        let store = CsvMeasurementStore::new(MemoryStorage::default(), "m.csv");
        store
            .insert_many(vec![new_row("Ada", "Hip IR", 30.0, 35.0)])
            .await
            .unwrap();

        let err = store.delete(42).await.unwrap_err();
        assert!(matches!(err, RomError::NotFound { id: 42 }));

        let removed = store.delete(1).await.unwrap();
        assert_eq!(removed.test, "Hip IR");
        assert!(store.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all_reports_count() {
        let store = CsvMeasurementStore::new(MemoryStorage::default(), "m.csv");
        store
            .insert_many(vec![
                new_row("Ada", "Hip IR", 30.0, 35.0),
                new_row("Grace", "Hip IR", 30.0, 35.0),
            ])
            .await
            .unwrap();

        assert_eq!(store.delete_all().await.unwrap(), 2);
        assert_eq!(store.delete_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_search_filters_by_name() {
        let store = CsvMeasurementStore::new(MemoryStorage::default(), "m.csv");
        store
            .insert_many(vec![
                new_row("Ada", "Hip IR", 30.0, 35.0),
                new_row("Grace", "Hip IR", 30.0, 35.0),
            ])
            .await
            .unwrap();

        let query = SearchQuery {
            name: Some("gra".to_string()),
            ..Default::default()
        };
        let found = store.search(&query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Grace");
    }

    #[test]
    fn test_decode_rejects_corrupted_rows() {
        let data = b"id,name,surname,date,test,full_rom,left,right,result\n\
                     x,Ada,L,2024-01-01,Hip IR,40,30,35,no_match\n";
        assert!(matches!(decode(data), Err(RomError::CsvError(_))));
    }
}
