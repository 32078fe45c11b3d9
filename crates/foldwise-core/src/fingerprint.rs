use crate::dataset::Dataset;
use sha2::{Digest, Sha256};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Content hash of a loaded dataset: schema, labels, features and effort.
///
/// Independent of file formatting (whitespace, float spelling), so two CSVs
/// that parse to the same instances share a fingerprint.
pub fn dataset_fingerprint(dataset: &Dataset) -> String {
    let mut h = Sha256::new();
    for name in dataset.feature_names() {
        h.update(name.as_bytes());
        h.update([0u8]);
    }
    h.update(dataset.effort_attribute().unwrap_or("").as_bytes());
    h.update([0u8]);
    for inst in dataset.instances() {
        h.update([u8::from(inst.label.is_positive())]);
        for v in &inst.features {
            h.update(v.to_bits().to_le_bytes());
        }
        if let Some(e) = inst.effort {
            h.update(e.to_bits().to_le_bytes());
        }
    }
    hex::encode(h.finalize())
}
