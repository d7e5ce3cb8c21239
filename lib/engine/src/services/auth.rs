//! The authorization services: group membership registration and listing.

use super::{optional_iri, required_iri, store_failure};
use crate::query::{delete_data, insert_data, normalize_whitespace};
use crate::{InterfaceDeclaration, Operation, ServiceContext, ServiceDescriptor};
use osfws_model::vocab::sioc;
use osfws_model::{
    CatalogEntry, ErrorCatalog, HttpMethod, OperationResult, Payload, Representation,
    RequestParams, Severity, Triple, TABULAR_RESULTS,
};
use tracing::info;

pub const VALIDATOR_REGION: &str = "auth-validator";
pub const LISTER_DATASET_REGION: &str = "auth-lister:dataset";
pub const LISTER_WS_REGION: &str = "auth-lister:ws";
pub const LISTER_GROUPS_REGION: &str = "auth-lister:groups";
pub const LISTER_GROUP_USERS_REGION: &str = "auth-lister:group_users";
pub const LISTER_ACCESS_USER_REGION: &str = "auth-lister:access_user";

/// Every cache that depends on group memberships.
pub const MEMBERSHIP_CACHE_REGIONS: [&str; 6] = [
    VALIDATOR_REGION,
    LISTER_DATASET_REGION,
    LISTER_WS_REGION,
    LISTER_GROUPS_REGION,
    LISTER_GROUP_USERS_REGION,
    LISTER_ACCESS_USER_REGION,
];

pub static REGISTRAR_USER_ERRORS: ErrorCatalog = ErrorCatalog::new(
    "auth/registrar/user",
    &[
        CatalogEntry {
            code: "_200",
            status: 400,
            name: "No user URI specified",
            description: "No user URI has been defined for this request",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_201",
            status: 400,
            name: "No group URI specified",
            description: "No group URI has been defined for this request",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_202",
            status: 400,
            name: "Unknown action",
            description: "The action parameter must be 'join' or 'leave'",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_203",
            status: 400,
            name: "Invalid URI",
            description: "The user or group URI is not a valid IRI",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_300",
            status: 500,
            name: "Can't register the user to the group",
            description: "An error occurred when we tried to add the user to the group",
            level: Severity::Fatal,
        },
        CatalogEntry {
            code: "_301",
            status: 500,
            name: "Can't unregister the user from the group",
            description: "An error occurred when we tried to remove the user from the group",
            level: Severity::Fatal,
        },
    ],
);

pub static LISTER_ERRORS: ErrorCatalog = ErrorCatalog::new(
    "auth/lister",
    &[
        CatalogEntry {
            code: "_200",
            status: 400,
            name: "Unknown listing mode",
            description: "The mode parameter must be 'groups' or 'group_users'",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_201",
            status: 400,
            name: "No group URI specified",
            description: "The 'group_users' mode requires a group URI",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_202",
            status: 400,
            name: "Invalid URI",
            description: "The user or group URI is not a valid IRI",
            level: Severity::Warning,
        },
        CatalogEntry {
            code: "_300",
            status: 500,
            name: "Can't get the list",
            description: "An error occurred when we tried to get the requested list",
            level: Severity::Fatal,
        },
    ],
);

pub static AUTH_REGISTRAR_USER: ServiceDescriptor = ServiceDescriptor {
    name: "auth/registrar/user",
    method: HttpMethod::Get,
    default_version: "3.0",
    interfaces: &[InterfaceDeclaration {
        name: "default",
        compatible_with: "3.0",
        operation: Operation::AuthRegistrarUser,
    }],
    representations: &[Representation::RdfXml, Representation::N3],
    errors: &REGISTRAR_USER_ERRORS,
};

pub static AUTH_LISTER: ServiceDescriptor = ServiceDescriptor {
    name: "auth/lister",
    method: HttpMethod::Get,
    default_version: "3.0",
    interfaces: &[InterfaceDeclaration {
        name: "default",
        compatible_with: "3.0",
        operation: Operation::AuthLister,
    }],
    representations: TABULAR_RESULTS,
    errors: &LISTER_ERRORS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MembershipAction {
    Join,
    Leave,
}

impl MembershipAction {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "join" => Some(MembershipAction::Join),
            "leave" => Some(MembershipAction::Leave),
            _ => None,
        }
    }
}

/// Adds a user to a group (`action=join`) or removes it (`action=leave`).
pub async fn registrar_user(params: &RequestParams, context: &ServiceContext) -> OperationResult {
    let errors = &REGISTRAR_USER_ERRORS;
    let user = required_iri(params, "user_uri", errors, "_200", "_203")?;
    let group = required_iri(params, "group_uri", errors, "_201", "_203")?;
    let action = MembershipAction::parse(params.get_or_empty("action"))
        .ok_or_else(|| errors.error_with_debug("_202", params.get_or_empty("action")))?;

    let membership = [Triple::new(user.clone(), sioc::MEMBER_OF, group.clone())];
    let graph = &context.graphs.auth;
    match action {
        MembershipAction::Join => context
            .store
            .update(&insert_data(graph, &membership))
            .await
            .map_err(store_failure(errors, "_300"))?,
        MembershipAction::Leave => context
            .store
            .update(&delete_data(graph, &membership))
            .await
            .map_err(store_failure(errors, "_301"))?,
    }

    info!(
        user = user.as_str(),
        group = group.as_str(),
        ?action,
        "Group membership changed"
    );
    Ok(Payload::Empty)
}

/// Lists the groups of a user (or every group), or the users of a group.
///
/// Results are cached in the region of the listing mode.
pub async fn lister(params: &RequestParams, context: &ServiceContext) -> OperationResult {
    let errors = &LISTER_ERRORS;
    let mode = normalize_whitespace(params.get_or_empty("mode"));
    let graph = &context.graphs.auth;

    let (region, key, query) = match mode.as_str() {
        "groups" => match optional_iri(params, "user_uri", errors, "_202")? {
            Some(user) => (
                LISTER_GROUPS_REGION,
                user.as_str().to_owned(),
                format!(
                    "SELECT ?group WHERE {{ GRAPH {graph} {{ {user} {} ?group }} }} ORDER BY ?group",
                    sioc::MEMBER_OF
                ),
            ),
            None => (
                LISTER_GROUPS_REGION,
                String::new(),
                format!(
                    "SELECT DISTINCT ?group WHERE {{ GRAPH {graph} {{ ?user {} ?group }} }} ORDER BY ?group",
                    sioc::MEMBER_OF
                ),
            ),
        },
        "group_users" => {
            let group = required_iri(params, "group_uri", errors, "_201", "_202")?;
            (
                LISTER_GROUP_USERS_REGION,
                group.as_str().to_owned(),
                format!(
                    "SELECT ?user WHERE {{ GRAPH {graph} {{ ?user {} {group} }} }} ORDER BY ?user",
                    sioc::MEMBER_OF
                ),
            )
        }
        _ => return Err(errors.error_with_debug("_200", mode)),
    };

    if let Some(payload) = context.cache.get(region, &key) {
        return Ok(payload);
    }
    let generation = context.cache.generation(region);
    let solutions = context
        .store
        .select(&query)
        .await
        .map_err(store_failure(errors, "_300"))?;
    let payload = Payload::Solutions(solutions);
    context.cache.insert(region, generation, key, payload.clone());
    Ok(payload)
}
