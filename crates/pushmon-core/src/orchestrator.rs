//! Normalization orchestrator: the public entry point for a project push.
//!
//! Every record produces exactly one result, in input order. Per-record
//! problems end up in that record's `errors`; only a registry gap (no schema
//! for a known type at the requested version) fails the whole call.

use crate::detector;
use crate::error::{MonitorError, RegistryError};
use crate::normalizers;
use crate::registry::SchemaRegistry;
use crate::types::{
    MonitorType, NormalizationContext, NormalizationError, NormalizedMonitorResult,
    RawMonitorRecord,
};

/// Normalizes batches against one schema registry.
#[derive(Debug, Clone, Copy)]
pub struct ProjectMonitorNormalizer<'r> {
    registry: &'r SchemaRegistry,
}

impl Default for ProjectMonitorNormalizer<'static> {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin())
    }
}

impl<'r> ProjectMonitorNormalizer<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn normalize(
        &self,
        batch: &[RawMonitorRecord],
        ctx: &NormalizationContext,
    ) -> Result<Vec<NormalizedMonitorResult>, RegistryError> {
        let results = batch
            .iter()
            .map(|raw| self.normalize_one(raw, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let with_errors = results.iter().filter(|r| !r.errors.is_empty()).count();
        tracing::info!(
            project_id = %ctx.project_id,
            version = %ctx.product_version,
            monitors = results.len(),
            with_errors,
            "normalized project monitors"
        );
        Ok(results)
    }

    pub fn normalize_one(
        &self,
        raw: &RawMonitorRecord,
        ctx: &NormalizationContext,
    ) -> Result<NormalizedMonitorResult, RegistryError> {
        let id = raw.id();
        let declared = raw.declared_type();

        let Some(monitor_type) = declared.and_then(MonitorType::parse) else {
            tracing::warn!(monitor_id = %id, declared_type = ?declared, "unknown monitor type");
            let error =
                MonitorError::unknown_type(&id, raw.fields().get("type"), &ctx.product_version);
            return Ok(NormalizedMonitorResult {
                errors: vec![error.into()],
                normalized_fields: normalizers::normalize_unknown(raw, ctx, self.registry.common()),
                unsupported_keys: Vec::new(),
            });
        };

        let schema = self.registry.schema_for(monitor_type, &ctx.product_version)?;
        let (normalized_fields, mut errors) = normalizers::normalize(monitor_type, raw, ctx, schema);

        let unsupported_keys = detector::detect(raw, schema);
        if !unsupported_keys.is_empty() {
            errors.push(MonitorError::unsupported_keys(
                &id,
                &unsupported_keys,
                monitor_type,
                &ctx.product_version,
            ));
        }

        tracing::debug!(
            monitor_id = %id,
            monitor_type = %monitor_type,
            schema_range = %schema.range,
            errors = errors.len(),
            unsupported = unsupported_keys.len(),
            "normalized monitor"
        );

        Ok(NormalizedMonitorResult {
            errors: errors.into_iter().map(NormalizationError::from).collect(),
            normalized_fields,
            unsupported_keys,
        })
    }
}

/// Normalize a batch against the built-in registry.
pub fn normalize_project_monitors(
    batch: &[RawMonitorRecord],
    ctx: &NormalizationContext,
) -> Result<Vec<NormalizedMonitorResult>, RegistryError> {
    ProjectMonitorNormalizer::default().normalize(batch, ctx)
}
