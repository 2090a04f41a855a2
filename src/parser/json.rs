use serde::{Deserialize, Serialize};

/// Tag naming the shape of a [`JsonOwlObject`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JsonOwlObjectType {
    #[serde(rename = "class", alias = "Class")]
    Class,
    #[serde(rename = "property", alias = "ObjectProperty")]
    ObjectProperty,
    #[serde(rename = "svf", alias = "SomeValueFrom")]
    SomeValueFrom,
    #[serde(rename = "intersection", alias = "IntersectionOf")]
    IntersectionOf,
    #[serde(rename = "union", alias = "UnionOf")]
    UnionOf,
    #[serde(rename = "complement", alias = "ComplementOf")]
    ComplementOf,
    #[serde(rename = "individual", alias = "NamedIndividual")]
    NamedIndividual,
}

/// Tagged, loosely typed class expression as received from clients.
///
/// Every field is optional so that structurally incomplete input can be
/// deserialized and reported precisely by the parser.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonOwlObject {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<JsonOwlObjectType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<Box<JsonOwlObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filler: Option<Box<JsonOwlObject>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expressions: Option<Vec<JsonOwlObject>>,
}

impl JsonOwlObject {
    /// Named class reference.
    #[must_use]
    pub fn class(id: impl Into<String>) -> Self {
        Self {
            kind: Some(JsonOwlObjectType::Class),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Object property reference.
    #[must_use]
    pub fn object_property(id: impl Into<String>) -> Self {
        Self {
            kind: Some(JsonOwlObjectType::ObjectProperty),
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Existential restriction over `property` and `filler`.
    #[must_use]
    pub fn some_value_from(property: JsonOwlObject, filler: JsonOwlObject) -> Self {
        Self {
            kind: Some(JsonOwlObjectType::SomeValueFrom),
            property: Some(Box::new(property)),
            filler: Some(Box::new(filler)),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{JsonOwlObject, JsonOwlObjectType};

    #[test]
    fn deserializes_wire_and_long_tags() {
        let wire: JsonOwlObject = serde_json::from_value(json!({
            "type": "svf",
            "property": {"type": "property", "id": "BFO:0000066"},
            "filler": {"type": "class", "id": "GO:0005623"}
        }))
        .expect("wire tags");
        let long: JsonOwlObject = serde_json::from_value(json!({
            "type": "SomeValueFrom",
            "property": {"type": "ObjectProperty", "id": "BFO:0000066"},
            "filler": {"type": "Class", "id": "GO:0005623"}
        }))
        .expect("long tags");
        assert_eq!(wire, long);
        assert_eq!(
            wire,
            JsonOwlObject::some_value_from(
                JsonOwlObject::object_property("BFO:0000066"),
                JsonOwlObject::class("GO:0005623"),
            )
        );
    }

    #[test]
    fn tolerates_missing_fields() {
        let empty: JsonOwlObject = serde_json::from_value(json!({})).expect("empty object");
        assert_eq!(empty, JsonOwlObject::default());

        let untyped: JsonOwlObject =
            serde_json::from_value(json!({"id": "GO:0006915"})).expect("untyped");
        assert_eq!(untyped.kind, None);
        assert_eq!(untyped.id.as_deref(), Some("GO:0006915"));
    }

    #[test]
    fn serializes_compactly() {
        let value = serde_json::to_value(JsonOwlObject::class("GO:0006915")).expect("serialize");
        assert_eq!(value, json!({"type": "class", "id": "GO:0006915"}));
        assert_eq!(
            serde_json::from_value::<JsonOwlObjectType>(json!("complement")).expect("tag"),
            JsonOwlObjectType::ComplementOf
        );
    }
}
