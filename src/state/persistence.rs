use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::state::store::Snapshot;

/// Keep the last entry for each id, ordered by id.
fn dedup_by_id<T, F>(items: Vec<T>, id: F) -> Vec<T>
where
    F: Fn(&T) -> u64,
{
    let mut seen: BTreeMap<u64, T> = BTreeMap::new();
    for item in items {
        seen.insert(id(&item), item);
    }
    seen.into_values().collect()
}

/// Load a snapshot from a JSON file.
///
/// Deduplicates dishes, residents and menus by id (last occurrence wins).
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let content = fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;

    Ok(Snapshot {
        dishes: dedup_by_id(snapshot.dishes, |d| d.id),
        residents: dedup_by_id(snapshot.residents, |r| r.id),
        menus: dedup_by_id(snapshot.menus, |m| m.id),
    })
}

/// Save a snapshot to a JSON file.
pub fn save_snapshot<P: AsRef<Path>>(path: P, snapshot: &Snapshot) -> Result<()> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_and_save_roundtrip() {
        let json = r#"{
            "dishes": [
                {"id": 1, "name": "Millet Porridge", "texture": "regular", "is_blendable": true,
                 "calories_per_100g": 46, "dietary_flags": ["gluten_free"]}
            ],
            "residents": [
                {"id": 3, "name": "Li", "institution_id": 1,
                 "diet_tags": [{"kind": "low_sugar", "expires_at": "2030-01-01"}],
                 "allergies": [{"substance": "peanut", "severity": "severe"}]}
            ]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.dishes.len(), 1);
        assert!(snapshot.residents[0].diet_tags[0].is_active);
        assert!(snapshot.residents[0].allergies[0].is_active);
        assert!(snapshot.menus.is_empty());

        let out_file = NamedTempFile::new().unwrap();
        save_snapshot(out_file.path(), &snapshot).unwrap();

        let reloaded = load_snapshot(out_file.path()).unwrap();
        assert_eq!(reloaded, snapshot);
    }

    #[test]
    fn test_deduplication() {
        let json = r#"{
            "residents": [
                {"id": 1, "name": "First"},
                {"id": 1, "name": "Second"},
                {"id": 2, "name": "Other"}
            ]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.residents.len(), 2);
        // Last occurrence wins
        assert_eq!(snapshot.residents[0].name, "Second");
    }
}
