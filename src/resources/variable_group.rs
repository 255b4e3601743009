//
//  devops-state
//  resources/variable_group.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pipeline variable groups.
//!
//! Variable groups live at the organization level and are shared into
//! projects. Reads are project-scoped; writes go to the organization
//! endpoint and name the project explicitly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{AnyResource, FieldSpec, Resource, ResourceDescriptor, ResourceKind};
use crate::codec::{expect_bool, expect_string, AttrValue, Attributes, CodecError};
use crate::session::Scope;

const GROUP_TYPE: &str = "Vsts";

/// A single variable in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Secret values are never returned by the remote and read back as `None`.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub is_secret: bool,
}

impl Variable {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            is_secret: false,
        }
    }

    pub fn secret(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            is_secret: true,
        }
    }

    fn to_attr(&self) -> AttrValue {
        let mut map = BTreeMap::new();
        map.insert("value".to_string(), AttrValue::optional(self.value.clone()));
        map.insert("is_secret".to_string(), AttrValue::Bool(self.is_secret));
        AttrValue::Map(map)
    }

    fn from_attr(field: &str, value: AttrValue) -> Result<Self, CodecError> {
        let mut map = match value {
            AttrValue::Map(map) => map,
            other => return Err(CodecError::mismatch(field, "map", other.kind_name())),
        };
        let value = match map.remove("value") {
            None | Some(AttrValue::Null) => None,
            Some(v) => Some(expect_string(field, v)?),
        };
        let is_secret = match map.remove("is_secret") {
            None => false,
            Some(v) => expect_bool(field, v)?,
        };
        Ok(Self { value, is_secret })
    }
}

/// A variable group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableGroup {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub group_type: String,
    #[serde(default)]
    pub variables: BTreeMap<String, Variable>,
}

/// Body of a variable group creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVariableGroup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub variables: BTreeMap<String, Variable>,
}

impl CreateVariableGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            variables: BTreeMap::new(),
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, variable: Variable) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }
}

impl Resource for VariableGroup {
    const DESCRIPTOR: &'static ResourceDescriptor = &ResourceDescriptor {
        kind: ResourceKind::VariableGroup,
        fields: &[
            FieldSpec::identifier("id"),
            FieldSpec::editable("name"),
            FieldSpec::editable("description"),
            FieldSpec::field("group_type").wire("type"),
            FieldSpec::editable("variables"),
        ],
    };

    type CreateParams = CreateVariableGroup;

    fn attributes(&self) -> Attributes {
        let variables: BTreeMap<String, AttrValue> = self
            .variables
            .iter()
            .map(|(name, variable)| (name.clone(), variable.to_attr()))
            .collect();

        Attributes::new()
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("description", AttrValue::optional(self.description.clone()))
            .with("group_type", self.group_type.as_str())
            .with("variables", variables)
    }

    fn from_attributes(mut attributes: Attributes) -> Result<Self, CodecError> {
        let variables = attributes
            .take_map("variables")?
            .into_iter()
            .map(|(name, value)| {
                let variable = Variable::from_attr(&name, value)?;
                Ok((name, variable))
            })
            .collect::<Result<BTreeMap<_, _>, CodecError>>()?;

        Ok(Self {
            id: attributes.take_i64("id")?,
            name: attributes.take_string("name")?,
            description: attributes.take_opt_string("description")?,
            group_type: attributes.take_string("group_type")?,
            variables,
        })
    }

    fn into_any(self) -> AnyResource {
        AnyResource::VariableGroup(self)
    }

    fn from_any(any: AnyResource) -> Option<Self> {
        match any {
            AnyResource::VariableGroup(group) => Some(group),
            _ => None,
        }
    }

    fn collection_path(scope: &Scope) -> String {
        format!("/{}/_apis/distributedtask/variablegroups", scope.project)
    }

    fn item_path(scope: &Scope, id: &str) -> String {
        format!("/{}/_apis/distributedtask/variablegroups/{}", scope.project, id)
    }

    fn create_path(_scope: &Scope, _params: &CreateVariableGroup) -> String {
        "/_apis/distributedtask/variablegroups".to_string()
    }

    fn create_body(scope: &Scope, params: &CreateVariableGroup) -> Result<Value, CodecError> {
        let mut body = serde_json::to_value(params)?;
        if let Value::Object(map) = &mut body {
            map.insert("type".into(), json!(GROUP_TYPE));
            map.insert(
                "variableGroupProjectReferences".into(),
                json!([{
                    "name": params.name,
                    "projectReference": { "name": scope.project }
                }]),
            );
        }
        Ok(body)
    }

    fn update_path(&self, _scope: &Scope) -> crate::Result<String> {
        Ok(format!("/_apis/distributedtask/variablegroups/{}", self.id))
    }

    fn delete_path(scope: &Scope, id: &str) -> String {
        format!(
            "/_apis/distributedtask/variablegroups/{}?projectIds={}",
            id, scope.project
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{variable_group, FakeRemote};
    use serde_json::json;

    #[test]
    fn test_state_roundtrip() {
        let group = variable_group(4, "shared");
        let state = group.to_state();
        assert_eq!(
            state["variables"]["TOKEN"],
            json!({"is_secret::bool": "true", "value::none": null})
        );
        assert_eq!(state["variables"]["REGION"]["value"], json!("eu-west"));
        assert_eq!(VariableGroup::from_state(&state).unwrap(), group);
    }

    #[test]
    fn test_variable_names_with_separator_roundtrip() {
        let mut group = variable_group(4, "shared");
        group.variables.insert("DB::none".into(), Variable::plain("postgres"));
        group.variables.insert(
            "CACHE::int".into(),
            Variable {
                value: None,
                is_secret: true,
            },
        );
        let state = group.to_state();

        assert!(state["variables"]
            .as_object()
            .unwrap()
            .contains_key("DB::none::map"));
        assert_eq!(VariableGroup::from_state(&state).unwrap(), group);
    }

    #[test]
    fn test_wire_uses_type_key() {
        let wire = variable_group(4, "shared").to_wire().unwrap();
        assert_eq!(wire["type"], json!("Vsts"));
        assert_eq!(wire["variables"]["TOKEN"]["isSecret"], json!(true));
    }

    #[tokio::test]
    async fn test_create_names_project() {
        let remote = FakeRemote::new();
        remote.on_post(
            "/_apis/distributedtask/variablegroups",
            variable_group(4, "shared").to_wire().unwrap(),
        );
        let mut session = remote.session();

        let params = CreateVariableGroup::new("shared").with_variable("REGION", Variable::plain("eu-west"));
        let group = VariableGroup::create(&mut session, &params).await.unwrap();
        assert_eq!(group.id, 4);

        let body = remote.writes()[0].body.clone().unwrap();
        assert_eq!(body["type"], json!("Vsts"));
        assert_eq!(
            body["variableGroupProjectReferences"][0]["projectReference"]["name"],
            json!("web")
        );
        assert_eq!(body["variables"]["REGION"]["value"], json!("eu-west"));
    }

    #[tokio::test]
    async fn test_update_variables_sends_whole_map() {
        let remote = FakeRemote::new();
        let mut session = remote.session();
        let mut group = variable_group(4, "shared");

        let mut region = BTreeMap::new();
        region.insert("value".to_string(), AttrValue::from("us-east"));
        region.insert("is_secret".to_string(), AttrValue::Bool(false));
        let mut variables = BTreeMap::new();
        variables.insert("REGION".to_string(), AttrValue::Map(region));

        group
            .update(&mut session, "variables", AttrValue::Map(variables))
            .await
            .unwrap();

        assert_eq!(group.variables.len(), 1);
        let writes = remote.writes();
        assert_eq!(writes[0].path, "/_apis/distributedtask/variablegroups/4");
        assert_eq!(
            writes[0].body,
            Some(json!({"variables": {"REGION": {"value": "us-east", "isSecret": false}}}))
        );
    }

    #[tokio::test]
    async fn test_delete_path_names_project() {
        let remote = FakeRemote::new();
        let mut session = remote.session();
        VariableGroup::delete_by_id(&mut session, "4").await.unwrap();
        assert_eq!(
            remote.writes()[0].path,
            "/_apis/distributedtask/variablegroups/4?projectIds=web"
        );
    }
}
