use crate::error::Result;
use crate::writers::atomic::write_atomically;
use geojson::FeatureCollection;
use std::path::Path;
use tracing::debug;

pub struct GeoJsonWriter {
    pretty: bool,
}

impl GeoJsonWriter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serialize a feature collection to `path`
    pub fn write_collection(&self, collection: &FeatureCollection, path: &Path) -> Result<()> {
        write_atomically(path, |out| {
            if self.pretty {
                serde_json::to_writer_pretty(out, collection)?;
            } else {
                serde_json::to_writer(out, collection)?;
            }
            Ok(())
        })?;

        debug!(
            path = %path.display(),
            features = collection.features.len(),
            "Wrote GeoJSON collection"
        );
        Ok(())
    }
}

impl Default for GeoJsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
