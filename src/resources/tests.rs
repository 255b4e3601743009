//
//  devops-state
//  resources/tests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use super::*;
use crate::codec::decode_any;
use crate::testing::{build, pull_request, repository, user, variable_group};

fn samples() -> Vec<AnyResource> {
    let mut b = build(88);
    b.tags = vec!["nightly".into()];
    b.requested_for = Some(user("aad.bob", "Bob"));

    vec![
        b.into_any(),
        pull_request(17, "Add login page").into_any(),
        repository("r-1", "web").into_any(),
        user("aad.ana", "Ana").into_any(),
        variable_group(4, "shared").into_any(),
    ]
}

#[test]
fn test_every_kind_roundtrips_through_state() {
    let samples = samples();
    let kinds: Vec<ResourceKind> = samples.iter().map(AnyResource::kind).collect();
    assert_eq!(kinds, ResourceKind::ALL.to_vec());

    for sample in samples {
        let decoded = decode_any(sample.kind(), &sample.to_state()).unwrap();
        assert_eq!(decoded, sample, "{}", sample.kind());
    }
}

#[test]
fn test_every_kind_roundtrips_through_wire() {
    for sample in samples() {
        let wire = sample.to_wire().unwrap();
        let decoded = match sample.kind() {
            ResourceKind::Build => Build::from_wire(wire).unwrap().into_any(),
            ResourceKind::PullRequest => PullRequest::from_wire(wire).unwrap().into_any(),
            ResourceKind::Repository => Repository::from_wire(wire).unwrap().into_any(),
            ResourceKind::User => User::from_wire(wire).unwrap().into_any(),
            ResourceKind::VariableGroup => VariableGroup::from_wire(wire).unwrap().into_any(),
        };
        assert_eq!(decoded, sample);
    }
}

#[test]
fn test_ids_come_from_the_identifier_field() {
    let ids: Vec<String> = samples().iter().map(|s| s.id().unwrap()).collect();
    assert_eq!(ids, vec!["88", "17", "r-1", "aad.ana", "4"]);
}

#[test]
fn test_attributes_cover_declared_fields() {
    for sample in samples() {
        let state = sample.to_state();
        for field in sample.kind().descriptor().fields {
            assert!(
                state
                    .keys()
                    .any(|k| crate::codec::split_key(k).0 == field.local_name),
                "{} is missing {}",
                sample.kind(),
                field.local_name
            );
        }
    }
}

#[test]
fn test_set_attribute_rejects_unknown_fields() {
    let mut repo = repository("r-1", "web");
    assert!(matches!(
        repo.set_attribute("colour", "blue".into()),
        Err(CodecError::UnknownField { .. })
    ));
    repo.set_attribute("name", "api".into()).unwrap();
    assert_eq!(repo.name, "api");
}

#[test]
fn test_nested_resource_of_wrong_type_is_rejected() {
    let mut pr = pull_request(1, "x");
    let err = pr
        .set_attribute("created_by", AttrValue::resource(repository("r-9", "other")))
        .unwrap_err();
    assert!(matches!(
        err,
        CodecError::UnexpectedResource {
            expected: "User",
            found: "Repository",
            ..
        }
    ));
}
