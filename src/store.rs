use std::path::PathBuf;

use anyhow::Result;
use tokio::fs;

use crate::Valuations;

/// The forms that remember their valuations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Acquisition,
    Registration,
}

impl Form {
    pub fn key(self) -> &'static str {
        match self {
            Form::Acquisition => "acquisition-tax",
            Form::Registration => "registration-tax",
        }
    }
}

/// Last valuations entered per form, one JSON file each.
#[derive(Debug, Clone)]
pub struct ValuationStore {
    dir: PathBuf,
}

impl ValuationStore {
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn path(&self, form: Form) -> PathBuf {
        self.dir.join(format!("{}.json", form.key()))
    }

    /// Failing to remember valuations is not worth aborting a calculation.
    #[tracing::instrument(skip(self, valuations))]
    pub async fn save(&self, form: Form, valuations: &Valuations) {
        let contents = match serde_json::to_string(valuations) {
            Ok(contents) => contents,
            Err(err) => {
                tracing::error!(err = &err as &dyn std::error::Error);
                return;
            }
        };
        if let Err(err) = fs::write(self.path(form), contents).await {
            tracing::error!(err = &err as &dyn std::error::Error);
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn load(&self, form: Form) -> Option<Valuations> {
        let contents = fs::read_to_string(self.path(form)).await.ok()?;
        match serde_json::from_str(&contents) {
            Ok(valuations) => Some(valuations),
            Err(err) => {
                tracing::warn!(err = &err as &dyn std::error::Error, "ignoring stored valuations");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ValuationStore::new(dir.path().join("cache")).await.unwrap();

        assert_eq!(store.load(Form::Acquisition).await, None);

        let valuations = Valuations {
            land_valuation: Some(25_000_000),
            building_valuation: None,
        };
        store.save(Form::Acquisition, &valuations).await;

        assert_eq!(store.load(Form::Acquisition).await, Some(valuations));
        assert_eq!(store.load(Form::Registration).await, None);

        let stored = std::fs::read_to_string(dir.path().join("cache/acquisition-tax.json")).unwrap();
        assert_eq!(stored, r#"{"landValuation":25000000,"buildingValuation":null}"#);
    }

    #[tokio::test]
    async fn garbage_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = ValuationStore::new(dir.path()).await.unwrap();

        std::fs::write(dir.path().join("registration-tax.json"), "{broken").unwrap();
        assert_eq!(store.load(Form::Registration).await, None);
    }
}
