//! Entity unique-ID migration
//!
//! Earlier releases derived sensor unique IDs from display names; the
//! current scheme uses stable sensor keys. At config-entry setup, before
//! entities are added, persisted registry entries under this integration
//! are renamed from the legacy scheme to the current one. A rename whose
//! target unique ID is already taken is skipped and reported as a
//! collision: losing neither entity's history outranks completing the
//! migration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Slim view of one host entity-registry row
///
/// Only the fields the migrator touches; the host owns the full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Registry row id
    pub id: String,
    /// Full entity ID (domain.object_id)
    pub entity_id: String,
    /// Platform that created the entity
    pub platform: String,
    /// Persisted unique identifier
    pub unique_id: String,
}

impl RegistryEntry {
    /// Create an entry with a fresh row id
    pub fn new(
        entity_id: impl Into<String>,
        platform: impl Into<String>,
        unique_id: impl Into<String>,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string().to_lowercase(),
            entity_id: entity_id.into(),
            platform: platform.into(),
            unique_id: unique_id.into(),
        }
    }
}

/// One legacy-to-current unique-ID rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueIdRename {
    pub from: String,
    pub to: String,
}

/// Result of applying one rename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The entry now holds the current-scheme unique ID
    Migrated {
        entity_id: String,
        from: String,
        to: String,
    },
    /// Another entry already holds the target unique ID; both entries
    /// were left untouched
    Collision {
        entity_id: String,
        existing_entity_id: String,
        unique_id: String,
    },
}

/// Order-preserving view of the registry entries for one config entry
///
/// Callers pass in the entries registered under this integration; after
/// migration the (possibly renamed) entries are written back to the
/// host registry in the original order.
#[derive(Debug, Clone, Default)]
pub struct RegistryView {
    /// Primary index: entity_id -> entry, in host-registry order
    entries: IndexMap<String, RegistryEntry>,
}

impl RegistryView {
    /// Build a view from the host's registry entries
    pub fn new(entries: impl IntoIterator<Item = RegistryEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.entity_id.clone(), entry))
                .collect(),
        }
    }

    /// Look up an entry by entity ID
    pub fn get(&self, entity_id: &str) -> Option<&RegistryEntry> {
        self.entries.get(entity_id)
    }

    /// Look up the entry holding a unique ID
    pub fn find_by_unique_id(&self, unique_id: &str) -> Option<&RegistryEntry> {
        self.entries
            .values()
            .find(|entry| entry.unique_id == unique_id)
    }

    /// Iterate entries in host-registry order
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// Number of entries in the view
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the view holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the view, yielding entries for write-back to the host
    pub fn into_entries(self) -> Vec<RegistryEntry> {
        self.entries.into_values().collect()
    }

    fn set_unique_id(&mut self, entity_id: &str, unique_id: String) {
        if let Some(entry) = self.entries.get_mut(entity_id) {
            entry.unique_id = unique_id;
        }
    }
}

/// Apply unique-ID renames to a registry view
///
/// Entries whose unique ID matches no rename are untouched, so running
/// the migration again is a no-op: after a successful rename the legacy
/// unique ID no longer exists in the view.
pub fn migrate_unique_ids(
    view: &mut RegistryView,
    renames: &[UniqueIdRename],
) -> Vec<MigrationOutcome> {
    let mut outcomes = Vec::new();

    for rename in renames {
        let Some(entry) = view.find_by_unique_id(&rename.from) else {
            continue;
        };
        let entity_id = entry.entity_id.clone();

        if let Some(existing) = view.find_by_unique_id(&rename.to) {
            warn!(
                entity_id = %entity_id,
                existing_entity_id = %existing.entity_id,
                unique_id = %rename.to,
                "Skipping unique ID migration; target already registered"
            );
            outcomes.push(MigrationOutcome::Collision {
                entity_id,
                existing_entity_id: existing.entity_id.clone(),
                unique_id: rename.to.clone(),
            });
            continue;
        }

        info!(
            entity_id = %entity_id,
            from = %rename.from,
            to = %rename.to,
            "Migrating entity unique ID"
        );
        view.set_unique_id(&entity_id, rename.to.clone());
        outcomes.push(MigrationOutcome::Migrated {
            entity_id,
            from: rename.from.clone(),
            to: rename.to.clone(),
        });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIN: &str = "JF2ABCDE6L0000001";

    fn rename() -> UniqueIdRename {
        UniqueIdRename {
            from: format!("{VIN}_Odometer"),
            to: format!("{VIN}_odometer"),
        }
    }

    #[test]
    fn test_successful_migration() {
        let mut view = RegistryView::new([RegistryEntry::new(
            "sensor.test_vehicle_odometer",
            "subaru",
            format!("{VIN}_Odometer"),
        )]);

        let outcomes = migrate_unique_ids(&mut view, &[rename()]);

        assert_eq!(outcomes.len(), 1);
        assert!(matches!(outcomes[0], MigrationOutcome::Migrated { .. }));
        assert_eq!(
            view.get("sensor.test_vehicle_odometer").unwrap().unique_id,
            format!("{VIN}_odometer")
        );
    }

    #[test]
    fn test_collision_leaves_both_entries_unchanged() {
        let mut view = RegistryView::new([
            RegistryEntry::new(
                "sensor.test_vehicle_odometer",
                "subaru",
                format!("{VIN}_Odometer"),
            ),
            RegistryEntry::new(
                "sensor.test_vehicle_odometer_2",
                "subaru",
                format!("{VIN}_odometer"),
            ),
        ]);

        let outcomes = migrate_unique_ids(&mut view, &[rename()]);

        assert_eq!(
            outcomes,
            vec![MigrationOutcome::Collision {
                entity_id: "sensor.test_vehicle_odometer".to_string(),
                existing_entity_id: "sensor.test_vehicle_odometer_2".to_string(),
                unique_id: format!("{VIN}_odometer"),
            }]
        );
        assert_eq!(
            view.get("sensor.test_vehicle_odometer").unwrap().unique_id,
            format!("{VIN}_Odometer")
        );
        assert_eq!(
            view.get("sensor.test_vehicle_odometer_2").unwrap().unique_id,
            format!("{VIN}_odometer")
        );
    }

    #[test]
    fn test_migration_is_idempotent() {
        let mut view = RegistryView::new([RegistryEntry::new(
            "sensor.test_vehicle_odometer",
            "subaru",
            format!("{VIN}_Odometer"),
        )]);

        let first = migrate_unique_ids(&mut view, &[rename()]);
        let second = migrate_unique_ids(&mut view, &[rename()]);

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(
            view.get("sensor.test_vehicle_odometer").unwrap().unique_id,
            format!("{VIN}_odometer")
        );
    }

    #[test]
    fn test_unmatched_entries_untouched() {
        let mut view = RegistryView::new([RegistryEntry::new(
            "sensor.other_vehicle_odometer",
            "subaru",
            "OTHERVIN0000000AB_Odometer",
        )]);

        let outcomes = migrate_unique_ids(&mut view, &[rename()]);

        assert!(outcomes.is_empty());
        assert_eq!(
            view.get("sensor.other_vehicle_odometer").unwrap().unique_id,
            "OTHERVIN0000000AB_Odometer"
        );
    }

    #[test]
    fn test_view_order_preserved() {
        let view = RegistryView::new([
            RegistryEntry::new("sensor.b", "subaru", "b"),
            RegistryEntry::new("sensor.a", "subaru", "a"),
        ]);

        let ids: Vec<_> = view.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, ["sensor.b", "sensor.a"]);
    }
}
