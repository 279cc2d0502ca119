// ── Candidate reconciliation ──
//
// Pure functions over the draft set. `merge` projects the latest
// discovery snapshot onto the operator's working set; `apply_edit` is the
// reducer for individual draft edits. Neither touches the remote API.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::model::{
    CandidateDraft, CandidateId, DeviceKind, DiscoverySnapshot, Platform, SensorClass,
    default_candidate,
};

/// Editable drafts keyed by candidate id. Iteration is sorted by id.
pub type DraftSet = BTreeMap<CandidateId, CandidateDraft>;

/// Project a discovery snapshot onto the previous drafts.
///
/// Ids still reported carry their previous draft over unchanged; new ids
/// get a default draft; ids no longer reported are dropped. Without a
/// snapshot the result is empty.
pub fn merge(snapshot: Option<&DiscoverySnapshot>, previous: &DraftSet) -> DraftSet {
    let Some(snapshot) = snapshot else {
        return DraftSet::new();
    };

    let mut next = DraftSet::new();
    for platform in Platform::ALL {
        for address in snapshot.addresses(platform) {
            let id = CandidateId::new(platform, address);
            let draft = previous
                .get(&id)
                .cloned()
                .unwrap_or_else(|| default_candidate(platform, address));
            next.insert(id, draft);
        }
    }
    next
}

/// Drafts opted in for import, in id order.
pub fn selected(drafts: &DraftSet) -> Vec<CandidateDraft> {
    drafts.values().filter(|d| d.selected).cloned().collect()
}

// ── Draft edits ─────────────────────────────────────────────────────

/// One editable field of a draft with its new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftField {
    Selected(bool),
    Key(String),
    Name(String),
    Dimmable(bool),
    Class(SensorClass),
    Heat(bool),
    Cool(bool),
    Fan(bool),
    Standalone(bool),
}

impl DraftField {
    /// Field name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Selected(_) => "selected",
            Self::Key(_) => "key",
            Self::Name(_) => "name",
            Self::Dimmable(_) => "dimmable",
            Self::Class(_) => "class",
            Self::Heat(_) => "heat",
            Self::Cool(_) => "cool",
            Self::Fan(_) => "fan",
            Self::Standalone(_) => "standalone",
        }
    }

    /// Parse a `field` / `value` pair.
    pub fn parse(field: &str, value: &str) -> Result<Self, CoreError> {
        let field = field.trim().to_ascii_lowercase();
        Ok(match field.as_str() {
            "selected" => Self::Selected(parse_flag(&field, value)?),
            "key" => Self::Key(value.trim().to_owned()),
            "name" => Self::Name(value.to_owned()),
            "dimmable" => Self::Dimmable(parse_flag(&field, value)?),
            "class" => Self::Class(value.trim().parse().map_err(|_| {
                CoreError::ValidationFailed {
                    message: format!(
                        "invalid sensor class `{value}` (expected power, energy, temperature or illuminance)"
                    ),
                }
            })?),
            "heat" => Self::Heat(parse_flag(&field, value)?),
            "cool" => Self::Cool(parse_flag(&field, value)?),
            "fan" => Self::Fan(parse_flag(&field, value)?),
            "standalone" => Self::Standalone(parse_flag(&field, value)?),
            other => {
                return Err(CoreError::ValidationFailed {
                    message: format!("unknown draft field `{other}`"),
                });
            }
        })
    }
}

fn parse_flag(field: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(CoreError::ValidationFailed {
            message: format!("`{field}` expects a boolean, got `{value}`"),
        }),
    }
}

/// A single operator edit: `(candidate id, field, value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEdit {
    pub id: CandidateId,
    pub field: DraftField,
}

impl DraftEdit {
    pub fn new(id: CandidateId, field: DraftField) -> Self {
        Self { id, field }
    }
}

impl fmt::Display for DraftEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.field.name())
    }
}

impl FromStr for DraftEdit {
    type Err = CoreError;

    /// Parse `platform:address.field=value`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoreError::ValidationFailed {
            message: format!("edit `{s}` must look like `platform:address.field=value`"),
        };
        let (target, value) = s.split_once('=').ok_or_else(malformed)?;
        let (id, field) = target.rsplit_once('.').ok_or_else(malformed)?;
        Ok(Self {
            id: id.parse()?,
            field: DraftField::parse(field, value)?,
        })
    }
}

/// Apply one edit to the draft set.
///
/// Returns `Ok(false)` when the id is not in the set (for instance the
/// endpoint disappeared in a refresh); the set is left untouched. A field
/// that does not belong to the draft's platform is rejected.
pub fn apply_edit(drafts: &mut DraftSet, edit: &DraftEdit) -> Result<bool, CoreError> {
    let Some(draft) = drafts.get_mut(&edit.id) else {
        return Ok(false);
    };

    let record = &mut draft.record;
    match (&edit.field, &mut record.kind) {
        (DraftField::Selected(v), _) => draft.selected = *v,
        (DraftField::Key(v), _) => v.clone_into(&mut record.key),
        (DraftField::Name(v), _) => v.clone_into(&mut record.name),
        (DraftField::Dimmable(v), DeviceKind::Light { dimmable }) => *dimmable = *v,
        (DraftField::Class(v), DeviceKind::Sensor { class }) => *class = *v,
        (DraftField::Heat(v), DeviceKind::Climate { heat, .. }) => *heat = *v,
        (DraftField::Cool(v), DeviceKind::Climate { cool, .. }) => *cool = *v,
        (DraftField::Fan(v), DeviceKind::Climate { fan, .. }) => *fan = *v,
        (DraftField::Standalone(v), DeviceKind::Climate { standalone, .. }) => *standalone = *v,
        (field, kind) => {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "field `{}` does not apply to {} devices",
                    field.name(),
                    kind.platform()
                ),
            });
        }
    }
    Ok(true)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(light: &[&str], climate: &[&str], sensor: &[&str]) -> DiscoverySnapshot {
        let own = |xs: &[&str]| xs.iter().map(|s| (*s).to_string()).collect();
        DiscoverySnapshot {
            gateway: "gw".into(),
            enabled: true,
            light: own(light),
            climate: own(climate),
            sensor: own(sensor),
            ..DiscoverySnapshot::default()
        }
    }

    fn id(s: &str) -> CandidateId {
        s.parse().unwrap()
    }

    #[test]
    fn merge_without_snapshot_is_empty() {
        let previous = merge(Some(&snapshot(&["12"], &[], &[])), &DraftSet::new());
        assert!(merge(None, &previous).is_empty());
    }

    #[test]
    fn merge_synthesizes_defaults_for_new_addresses() {
        let drafts = merge(Some(&snapshot(&["12"], &["3"], &["51"])), &DraftSet::new());
        let ids: Vec<_> = drafts.keys().map(CandidateId::as_str).collect();
        assert_eq!(ids, vec!["climate:3", "light:12", "sensor:51"]);
        assert_eq!(drafts[&id("sensor:51")].record.key, "discovered_power_51");
    }

    #[test]
    fn merge_preserves_edits() {
        let snap = snapshot(&["12", "13"], &[], &[]);
        let mut drafts = merge(Some(&snap), &DraftSet::new());
        apply_edit(&mut drafts, &"light:12.name=Kitchen".parse().unwrap()).unwrap();
        apply_edit(&mut drafts, &"light:12.dimmable=yes".parse().unwrap()).unwrap();
        apply_edit(&mut drafts, &"light:13.selected=false".parse().unwrap()).unwrap();
        let edited = drafts.clone();

        let remerged = merge(Some(&snap), &drafts);
        assert_eq!(remerged, edited);
        assert_eq!(remerged[&id("light:12")].record.name, "Kitchen");
        assert!(!remerged[&id("light:13")].selected);
    }

    #[test]
    fn merge_drops_stale_entries() {
        let drafts = merge(Some(&snapshot(&["12", "13"], &[], &[])), &DraftSet::new());
        let next = merge(Some(&snapshot(&["13"], &[], &[])), &drafts);
        assert!(!next.contains_key(&id("light:12")));
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn rename_keeps_identity() {
        let snap = snapshot(&["12"], &[], &[]);
        let mut drafts = merge(Some(&snap), &DraftSet::new());
        assert!(apply_edit(&mut drafts, &"light:12.key=kitchen_main".parse().unwrap()).unwrap());

        let next = merge(Some(&snap), &drafts);
        let draft = &next[&id("light:12")];
        assert_eq!(draft.id, id("light:12"));
        assert_eq!(draft.record.key, "kitchen_main");
    }

    #[test]
    fn edit_of_unknown_id_is_ignored() {
        let mut drafts = merge(Some(&snapshot(&["12"], &[], &[])), &DraftSet::new());
        let before = drafts.clone();
        assert!(!apply_edit(&mut drafts, &"cover:99.name=Gone".parse().unwrap()).unwrap());
        assert_eq!(drafts, before);
    }

    #[test]
    fn edit_of_foreign_field_is_rejected() {
        let mut drafts = merge(Some(&snapshot(&["12"], &["3"], &[])), &DraftSet::new());
        assert!(apply_edit(&mut drafts, &"light:12.heat=false".parse().unwrap()).is_err());
        assert!(apply_edit(&mut drafts, &"climate:3.heat=false".parse().unwrap()).unwrap());
        assert_eq!(
            drafts[&id("climate:3")].record.kind,
            DeviceKind::Climate {
                heat: false,
                cool: true,
                fan: true,
                standalone: true
            }
        );
    }

    #[test]
    fn edit_parsing() {
        let edit: DraftEdit = "sensor:51.class=Energy".parse().unwrap();
        assert_eq!(edit.id, id("sensor:51"));
        assert_eq!(edit.field, DraftField::Class(SensorClass::Energy));
        assert_eq!(edit.to_string(), "sensor:51.class");

        let name: DraftEdit = "light:12.name=Living room = main".parse().unwrap();
        assert_eq!(name.field, DraftField::Name("Living room = main".into()));

        assert!("light:12.dimmable=maybe".parse::<DraftEdit>().is_err());
        assert!("light:12.colour=red".parse::<DraftEdit>().is_err());
        assert!("light:12=red".parse::<DraftEdit>().is_err());
        assert!("light:12.name".parse::<DraftEdit>().is_err());
    }

    #[test]
    fn selected_filters_and_orders() {
        let mut drafts = merge(Some(&snapshot(&["13", "12"], &[], &[])), &DraftSet::new());
        apply_edit(&mut drafts, &"light:13.selected=0".parse().unwrap()).unwrap();
        let picked: Vec<_> = selected(&drafts).into_iter().map(|d| d.id).collect();
        assert_eq!(picked, vec![id("light:12")]);
    }
}
