//! Entity metadata resolution.
//!
//! [`EntityResolver`] is the single entry point callers use. Each method reads
//! what it needs from the schema, configuration and permission sources
//! concurrently, then hands the results to the pure merge, sort and
//! validation logic in `adminmeta-core`. Any failed read fails the whole
//! call; nothing is cached between calls.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use adminmeta_core::configuration::{
    ConfigurationKey, CrudView, EntityCrudSettings, EntityDiction, RelationTemplate,
};
use adminmeta_core::field_types::{resolve_field_types, FieldType};
use adminmeta_core::ordering::{compare_names, sort_by_list};
use adminmeta_core::relations::{visible_relations, ResolvedRelation};
use adminmeta_core::roles::{entity_access_capability, CAN_CONFIGURE_APP};
use adminmeta_core::schema::{EntityField, EntityFieldType, EntityRelation, EntitySchema};
use adminmeta_core::selections::{resolve_selections, ColorableSelection};
use adminmeta_core::strings::user_friendly_case;
use adminmeta_core::template::{display_value, render_template, validate_template};
use adminmeta_core::validation::{
    evaluate_record, merge_entity_validations, FieldViolation, ValidationRule,
};
use adminmeta_core::CoreError;

use crate::configuration::{Configuration, ConfigurationStore};
use crate::permissions::{filter_permitted, RolePermissions};
use crate::schema::SchemaProvider;
use crate::view::{EntityOption, ResolvedDiction, ResolvedEntityView, ResolvedField};

type Labels = HashMap<String, String>;
type TypeOverrides = HashMap<String, FieldType>;
type SelectionOverrides = HashMap<String, Vec<ColorableSelection>>;
type ValidationOverrides = HashMap<String, Vec<ValidationRule>>;

/// Configured label of `name`, or its user-friendly form when unset or empty.
fn label_or_default(labels: &Labels, name: &str) -> String {
    labels
        .get(name)
        .filter(|label| !label.is_empty())
        .cloned()
        .unwrap_or_else(|| user_friendly_case(name))
}

/// Resolves admin metadata for entities on behalf of roles.
#[derive(Clone)]
pub struct EntityResolver {
    schema: Arc<dyn SchemaProvider>,
    configuration: Configuration,
    permissions: Arc<dyn RolePermissions>,
}

impl EntityResolver {
    pub fn new(
        schema: Arc<dyn SchemaProvider>,
        store: Arc<dyn ConfigurationStore>,
        permissions: Arc<dyn RolePermissions>,
    ) -> Self {
        Self {
            schema,
            configuration: Configuration::new(store),
            permissions,
        }
    }

    async fn schema_of(&self, entity: &str) -> Result<Arc<EntitySchema>, CoreError> {
        self.schema.entity(entity).await?.ok_or_else(|| {
            tracing::debug!(entity, "Entity not present in schema");
            CoreError::not_found()
        })
    }

    async fn scoped<T: serde::de::DeserializeOwned>(
        &self,
        key: ConfigurationKey,
        entity: &str,
    ) -> Result<T, CoreError> {
        self.configuration.show(key, Some(entity)).await
    }

    async fn global<T: serde::de::DeserializeOwned>(
        &self,
        key: ConfigurationKey,
    ) -> Result<T, CoreError> {
        self.configuration.show(key, None).await
    }

    // -----------------------------------------------------------------------
    // Entities
    // -----------------------------------------------------------------------

    /// Entities offered in navigation: everything not disabled, sorted by
    /// name and then by the configured entity order.
    pub async fn active_entities(&self) -> Result<Vec<EntityOption>, CoreError> {
        let (names, disabled, order) = tokio::try_join!(
            self.schema.entity_names(),
            self.global::<Vec<String>>(ConfigurationKey::DisabledEntities),
            self.global::<Vec<String>>(ConfigurationKey::EntitiesOrder),
        )?;

        let mut active: Vec<EntityOption> = names
            .into_iter()
            .filter(|name| !disabled.contains(name))
            .map(|name| EntityOption {
                label: name.clone(),
                value: name,
            })
            .collect();
        active.sort_by(|a, b| compare_names(&a.value, &b.value));
        sort_by_list(&mut active, &order, |option| option.value.as_str());

        tracing::debug!(count = active.len(), "Resolved active entities");
        Ok(active)
    }

    pub async fn entity_exists(&self, entity: &str) -> Result<bool, CoreError> {
        Ok(self.schema.entity(entity).await?.is_some())
    }

    pub async fn is_entity_disabled(&self, entity: &str) -> Result<bool, CoreError> {
        let disabled: Vec<String> = self.global(ConfigurationKey::DisabledEntities).await?;
        Ok(disabled.iter().any(|name| name == entity))
    }

    /// Fail with `NotFound` unless `role` may work with `entity`.
    ///
    /// Absent entities, disabled entities (unless the role can configure the
    /// app) and missing access capability all yield the same error so callers
    /// cannot tell which one applied.
    pub async fn ensure_entity_access(&self, entity: &str, role: &str) -> Result<(), CoreError> {
        let (exists, disabled) =
            tokio::try_join!(self.entity_exists(entity), self.is_entity_disabled(entity))?;

        if !exists {
            tracing::debug!(entity, role, "Access denied: unknown entity");
            return Err(CoreError::not_found());
        }

        if disabled && !self.permissions.can_access(role, CAN_CONFIGURE_APP).await? {
            tracing::debug!(entity, role, "Access denied: entity disabled");
            return Err(CoreError::not_found());
        }

        if !self
            .permissions
            .can_access(role, &entity_access_capability(entity))
            .await?
        {
            tracing::debug!(entity, role, "Access denied: missing entity capability");
            return Err(CoreError::not_found());
        }

        Ok(())
    }

    /// Singular and plural names, falling back to the user-friendly entity name.
    pub async fn entity_diction(&self, entity: &str) -> Result<ResolvedDiction, CoreError> {
        let (_, diction) = tokio::try_join!(
            self.schema_of(entity),
            self.scoped::<EntityDiction>(ConfigurationKey::EntityDiction, entity),
        )?;

        let fallback = user_friendly_case(entity);
        let pick = |value: Option<String>| {
            value
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| fallback.clone())
        };
        Ok(ResolvedDiction {
            singular: pick(diction.singular),
            plural: pick(diction.plural),
        })
    }

    pub async fn entity_crud_settings(&self, entity: &str) -> Result<EntityCrudSettings, CoreError> {
        let (_, settings) = tokio::try_join!(
            self.schema_of(entity),
            self.scoped::<EntityCrudSettings>(ConfigurationKey::EntityCrudSettings, entity),
        )?;
        Ok(settings)
    }

    /// Columns hidden on one CRUD screen of `entity`.
    pub async fn hidden_columns(&self, entity: &str, view: CrudView) -> Result<Vec<String>, CoreError> {
        let (_, hidden) = tokio::try_join!(
            self.schema_of(entity),
            self.scoped::<Vec<String>>(view.hidden_columns_key(), entity),
        )?;
        Ok(hidden)
    }

    // -----------------------------------------------------------------------
    // Fields
    // -----------------------------------------------------------------------

    /// Fields in introspection order.
    pub async fn entity_fields(&self, entity: &str) -> Result<Vec<EntityField>, CoreError> {
        Ok(self.schema_of(entity).await?.fields.clone())
    }

    /// Fields in the configured order, unlisted fields last.
    pub async fn ordered_entity_fields(&self, entity: &str) -> Result<Vec<EntityField>, CoreError> {
        let (schema, order) = tokio::try_join!(
            self.schema_of(entity),
            self.scoped::<Vec<String>>(ConfigurationKey::EntityFieldsOrders, entity),
        )?;

        let mut fields = schema.fields.clone();
        sort_by_list(&mut fields, &order, |field| field.name.as_str());
        Ok(fields)
    }

    pub async fn primary_field(&self, entity: &str) -> Result<String, CoreError> {
        Ok(self.schema_of(entity).await?.primary_field().to_string())
    }

    pub async fn first_field_of_type(
        &self,
        entity: &str,
        field_type: EntityFieldType,
    ) -> Result<Option<String>, CoreError> {
        Ok(self
            .schema_of(entity)
            .await?
            .first_field_of_type(field_type)
            .map(str::to_string))
    }

    /// Display label of every field, in resolved field order.
    pub async fn field_labels(&self, entity: &str) -> Result<IndexMap<String, String>, CoreError> {
        let (fields, labels) = tokio::try_join!(
            self.ordered_entity_fields(entity),
            self.scoped::<Labels>(ConfigurationKey::EntityColumnsLabels, entity),
        )?;

        Ok(fields
            .into_iter()
            .map(|field| {
                let label = label_or_default(&labels, &field.name);
                (field.name, label)
            })
            .collect())
    }

    /// Form field type of every field, in resolved field order.
    pub async fn field_types(&self, entity: &str) -> Result<IndexMap<String, FieldType>, CoreError> {
        let (fields, overrides) = tokio::try_join!(
            self.ordered_entity_fields(entity),
            self.scoped::<TypeOverrides>(ConfigurationKey::EntityColumnsTypes, entity),
        )?;
        Ok(resolve_field_types(&fields, &overrides))
    }

    /// Selectable options of the fields that have any.
    pub async fn field_selections(
        &self,
        entity: &str,
    ) -> Result<IndexMap<String, Vec<ColorableSelection>>, CoreError> {
        let (fields, overrides, configured) = tokio::try_join!(
            self.ordered_entity_fields(entity),
            self.scoped::<TypeOverrides>(ConfigurationKey::EntityColumnsTypes, entity),
            self.scoped::<SelectionOverrides>(ConfigurationKey::EntitySelections, entity),
        )?;

        let types = resolve_field_types(&fields, &overrides);
        Ok(resolve_selections(&fields, &configured, &types))
    }

    /// Effective validation rules of every field, in resolved field order.
    pub async fn field_validations(
        &self,
        entity: &str,
    ) -> Result<IndexMap<String, Vec<ValidationRule>>, CoreError> {
        let (fields, overrides, configured) = tokio::try_join!(
            self.ordered_entity_fields(entity),
            self.scoped::<TypeOverrides>(ConfigurationKey::EntityColumnsTypes, entity),
            self.scoped::<ValidationOverrides>(ConfigurationKey::EntityValidations, entity),
        )?;

        let types = resolve_field_types(&fields, &overrides);
        Ok(merge_entity_validations(&fields, &types, &configured))
    }

    /// Label, type, selections and validations of every field, in resolved
    /// field order.
    pub async fn resolve_entity_fields(&self, entity: &str) -> Result<Vec<ResolvedField>, CoreError> {
        let (fields, labels, overrides, configured_selections, configured_validations) = tokio::try_join!(
            self.ordered_entity_fields(entity),
            self.scoped::<Labels>(ConfigurationKey::EntityColumnsLabels, entity),
            self.scoped::<TypeOverrides>(ConfigurationKey::EntityColumnsTypes, entity),
            self.scoped::<SelectionOverrides>(ConfigurationKey::EntitySelections, entity),
            self.scoped::<ValidationOverrides>(ConfigurationKey::EntityValidations, entity),
        )?;

        let types = resolve_field_types(&fields, &overrides);
        let mut selections = resolve_selections(&fields, &configured_selections, &types);
        let mut validations = merge_entity_validations(&fields, &types, &configured_validations);

        let resolved: Vec<ResolvedField> = fields
            .into_iter()
            .map(|field| ResolvedField {
                label: label_or_default(&labels, &field.name),
                field_type: types.get(&field.name).copied().unwrap_or(FieldType::Text),
                schema_type: field.field_type,
                is_id: field.is_id,
                selections: selections.swap_remove(&field.name).unwrap_or_default(),
                validations: validations.swap_remove(&field.name).unwrap_or_default(),
                name: field.name,
            })
            .collect();

        tracing::debug!(entity, fields = resolved.len(), "Resolved entity fields");
        Ok(resolved)
    }

    /// Check `record` against the effective rules and return the first
    /// violation of each failing field, in resolved field order.
    pub async fn validate_record(
        &self,
        entity: &str,
        record: &Map<String, Value>,
    ) -> Result<Vec<FieldViolation>, CoreError> {
        let fields = self.resolve_entity_fields(entity).await?;

        let labels: HashMap<&str, &str> = fields
            .iter()
            .map(|field| (field.name.as_str(), field.label.as_str()))
            .collect();
        let rules: IndexMap<String, Vec<ValidationRule>> = fields
            .iter()
            .map(|field| (field.name.clone(), field.validations.clone()))
            .collect();

        Ok(evaluate_record(&rules, record, |name| {
            labels
                .get(name)
                .map(|label| label.to_string())
                .unwrap_or_else(|| user_friendly_case(name))
        }))
    }

    // -----------------------------------------------------------------------
    // Relations
    // -----------------------------------------------------------------------

    /// Relations in introspection order, unfiltered.
    pub async fn entity_relations(&self, entity: &str) -> Result<Vec<EntityRelation>, CoreError> {
        Ok(self.schema_of(entity).await?.relations.clone())
    }

    /// Relations `role` may see, in configured order, labeled and typed.
    pub async fn resolve_entity_relations(
        &self,
        entity: &str,
        role: &str,
    ) -> Result<Vec<ResolvedRelation>, CoreError> {
        let (schema, disabled, labels, order, hidden) = tokio::try_join!(
            self.schema_of(entity),
            self.global::<Vec<String>>(ConfigurationKey::DisabledEntities),
            self.scoped::<Labels>(ConfigurationKey::EntityRelationsLabels, entity),
            self.scoped::<Vec<String>>(ConfigurationKey::EntityRelationsOrder, entity),
            self.scoped::<Vec<String>>(ConfigurationKey::HiddenEntityRelations, entity),
        )?;

        let candidates = visible_relations(schema.relations.clone(), &disabled, &hidden);
        let candidate_count = candidates.len();

        let mut permitted = filter_permitted(self.permissions.as_ref(), role, candidates, |relation| {
            relation.table.as_str()
        })
        .await?;
        sort_by_list(&mut permitted, &order, |relation| relation.table.as_str());

        tracing::debug!(
            entity,
            role,
            total = schema.relations.len(),
            visible = candidate_count,
            permitted = permitted.len(),
            "Resolved entity relations"
        );

        Ok(permitted
            .iter()
            .map(|relation| ResolvedRelation::resolve(relation, &labels))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    /// Validate a reference display format against the entity's fields and
    /// return the form to store.
    pub async fn validate_display_template(
        &self,
        entity: &str,
        template: &str,
    ) -> Result<String, CoreError> {
        let fields = self.ordered_entity_fields(entity).await?;
        let names: Vec<&str> = fields.iter().map(|field| field.name.as_str()).collect();
        Ok(validate_template(template, &names)?)
    }

    pub async fn relation_template(&self, entity: &str) -> Result<RelationTemplate, CoreError> {
        let (_, template) = tokio::try_join!(
            self.schema_of(entity),
            self.scoped::<RelationTemplate>(ConfigurationKey::EntityRelationTemplate, entity),
        )?;
        Ok(template)
    }

    /// Text shown when a record of `entity` is referenced from elsewhere:
    /// the configured format if any, else the record's primary key value.
    pub async fn reference_label(
        &self,
        entity: &str,
        record: &Map<String, Value>,
    ) -> Result<String, CoreError> {
        let (schema, template) = tokio::try_join!(
            self.schema_of(entity),
            self.scoped::<RelationTemplate>(ConfigurationKey::EntityRelationTemplate, entity),
        )?;

        if template.format.is_empty() {
            return Ok(display_value(record.get(schema.primary_field())));
        }
        Ok(render_template(&template.format, record))
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Everything the admin surface needs to render `entity` for `role`.
    pub async fn resolve_entity_view(
        &self,
        entity: &str,
        role: &str,
    ) -> Result<ResolvedEntityView, CoreError> {
        self.ensure_entity_access(entity, role).await?;

        let (diction, primary_field, crud_settings, fields, relations) = tokio::try_join!(
            self.entity_diction(entity),
            self.primary_field(entity),
            self.entity_crud_settings(entity),
            self.resolve_entity_fields(entity),
            self.resolve_entity_relations(entity, role),
        )?;

        Ok(ResolvedEntityView {
            entity: entity.to_string(),
            diction,
            primary_field,
            crud_settings,
            fields,
            relations,
        })
    }
}
