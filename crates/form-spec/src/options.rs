use std::collections::BTreeMap;

use tracing::debug;

use crate::answers::AnswerSet;
use crate::spec::field::{FieldSpec, HttpMethod};
use crate::spec::form::FormSchema;

/// Fetch needed to refresh one field's option list.
///
/// `value` is the dependency answer the request was issued for; it doubles as
/// the tag that decides whether the response is still current.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRequest {
    pub field_id: String,
    pub depends_on: String,
    pub value: String,
    pub endpoint: String,
    pub method: HttpMethod,
}

/// Remote option lists keyed by field id, overriding static options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicOptionsCache {
    options: BTreeMap<String, Vec<String>>,
    requested: BTreeMap<String, String>,
}

impl DynamicOptionsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field_id: &str) -> Option<&[String]> {
        self.options.get(field_id).map(Vec::as_slice)
    }

    /// Options a field should offer right now.
    pub fn effective<'a>(&'a self, field: &'a FieldSpec) -> &'a [String] {
        self.get(&field.id)
            .unwrap_or_else(|| field.static_options())
    }

    /// Dependency value the latest request for `field_id` was tagged with.
    pub fn requested_value(&self, field_id: &str) -> Option<&str> {
        self.requested.get(field_id).map(String::as_str)
    }

    /// Plans refetches for every field whose options depend on `source_id`.
    ///
    /// A request is issued once per settled dependency value: setting the same
    /// value again does not refetch. Blank or multi-choice answers never
    /// trigger a fetch and drop the tags of requests still in flight.
    pub fn requests_for(
        &mut self,
        schema: &FormSchema,
        source_id: &str,
        answers: &AnswerSet,
    ) -> Vec<OptionRequest> {
        let Some(value) = answers
            .text(source_id)
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            // no settled value: any fetch still in flight is for an old value
            for field in schema.dependents_of(source_id) {
                self.requested.remove(&field.id);
            }
            return Vec::new();
        };

        let mut requests = Vec::new();
        for field in schema.dependents_of(source_id) {
            let Some(dynamic) = &field.dynamic_options else {
                continue;
            };
            if self.requested_value(&field.id) == Some(value) {
                continue;
            }
            self.requested.insert(field.id.clone(), value.to_string());
            requests.push(OptionRequest {
                field_id: field.id.clone(),
                depends_on: dynamic.depends_on.clone(),
                value: value.to_string(),
                endpoint: dynamic.endpoint.clone(),
                method: dynamic.method,
            });
        }
        requests
    }

    /// Stores a fetched list if `request` is still the latest one for its field.
    ///
    /// Returns `false` when the response was superseded and dropped.
    pub fn complete(&mut self, request: &OptionRequest, options: Vec<String>) -> bool {
        if self.requested_value(&request.field_id) != Some(request.value.as_str()) {
            debug!(
                field_id = %request.field_id,
                value = %request.value,
                "discarding superseded option response"
            );
            return false;
        }
        self.options.insert(request.field_id.clone(), options);
        true
    }

    /// Forgets a failed request so the same dependency value can be retried.
    ///
    /// Previously cached options stay in place.
    pub fn fail(&mut self, request: &OptionRequest) {
        if self.requested_value(&request.field_id) == Some(request.value.as_str()) {
            self.requested.remove(&request.field_id);
        }
    }

    pub fn clear(&mut self) {
        self.options.clear();
        self.requested.clear();
    }
}
