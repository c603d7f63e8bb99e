//! Fluent aggregation pipeline builder.

use super::Target;
use crate::config::{BranchReuse, BuilderConfig};
use crate::core::{Attachment, Document, FacetSpec, RangeOperator, SortSpec, Stage, SwitchCase, UnwindOptions};
use crate::errors::{AggflowError, DuplicateReferenceError, ErrorInfo, MissingSubPipelineError};
use crate::events::{
    EventSink, NoOpEventSink, JOIN_SKIPPED, MATCH_REJECTED, STAGE_ROUTED, SUBPIPELINE_CONSUMED,
    SUBPIPELINE_SPLICED,
};
use crate::relations::{NoRelations, Relation, RelationResolver};
use crate::stages;
use crate::subpipeline::{NameGenerator, SubPipelineRegistry};
use futures::future::try_join_all;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Builder assembling an ordered list of aggregation stages.
///
/// Stages go either to the main sequence or to a named sub-pipeline. Named
/// sub-pipelines stay out of the result until they are spliced in with
/// [`append_sub_pipeline`](Self::append_sub_pipeline) or consumed as the
/// branches of a [`conditional_match`](Self::conditional_match).
///
/// A builder is plain owned state: every mutation takes `&mut self`, so one
/// instance cannot be driven from two tasks at once.
pub struct AggregationBuilder {
    /// The committed stage sequence.
    stages: Vec<Stage>,
    /// Uncommitted stage lists by name.
    sub_pipelines: SubPipelineRegistry,
    /// Generator for reserved names.
    names: NameGenerator,
    /// Schema lookups for joins.
    resolver: Arc<dyn RelationResolver>,
    config: BuilderConfig,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for AggregationBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregationBuilder")
            .field("stages", &self.stages.len())
            .field("sub_pipelines", &self.sub_pipelines.names())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for AggregationBuilder {
    fn default() -> Self {
        Self::new(Arc::new(NoRelations))
    }
}

impl AggregationBuilder {
    /// Creates a builder that resolves join relations through `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<dyn RelationResolver>) -> Self {
        let config = BuilderConfig::default();
        Self {
            stages: Vec::new(),
            sub_pipelines: SubPipelineRegistry::new(),
            names: NameGenerator::new(config.auto_name_prefix.clone()),
            resolver,
            config,
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Replaces the configuration.
    ///
    /// Names reserved afterwards use the new prefix but continue the same
    /// counter, so no earlier name is handed out again.
    #[must_use]
    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.names.set_prefix(config.auto_name_prefix.clone());
        self.config = config;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Reserves a fresh sub-pipeline name.
    ///
    /// The name is `<auto_name_prefix><n>` with `n` never reused by this
    /// builder, skipping names that already hold stages.
    pub fn reserve_sub_pipeline_name(&mut self) -> String {
        let registry = &self.sub_pipelines;
        self.names.next_name(|name| registry.contains(name))
    }

    /// Appends an already built stage to `target`.
    pub fn route(&mut self, stage: Stage, target: impl Into<Target>) -> &mut Self {
        let target = target.into();
        self.events.emit(
            STAGE_ROUTED,
            Some(json!({ "kind": stage.kind().operator(), "target": target.name() })),
        );
        match target {
            Target::Main => self.stages.push(stage),
            Target::SubPipeline(name) => self.sub_pipelines.append(name, stage),
        }
        self
    }

    /// Filters on `field == value`.
    pub fn equality_match(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
        target: impl Into<Target>,
    ) -> &mut Self {
        self.route(stages::equality_match(field, value), target)
    }

    /// Filters on `field <operator> value`.
    pub fn range_match(
        &mut self,
        field: impl Into<String>,
        operator: RangeOperator,
        value: impl Into<Value>,
        target: impl Into<Target>,
    ) -> &mut Self {
        self.route(stages::range_match(field, operator, value), target)
    }

    /// Filters on `field < value`.
    pub fn match_less_than(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
        target: impl Into<Target>,
    ) -> &mut Self {
        self.range_match(field, RangeOperator::LessThan, value, target)
    }

    /// Filters on `field > value`.
    pub fn match_greater_than(
        &mut self,
        field: impl Into<String>,
        value: impl Into<Value>,
        target: impl Into<Target>,
    ) -> &mut Self {
        self.range_match(field, RangeOperator::GreaterThan, value, target)
    }

    /// Builds a query-time conditional filter from three sub-pipelines.
    ///
    /// `condition`, `then` and `otherwise` name registry entries. All three
    /// must exist; on success they are removed and their stages become the
    /// `if`/`then`/`else` conjunctions of a single `$match`.
    ///
    /// A name may appear more than once when the config allows branch reuse:
    /// it is consumed once and copied into each position.
    ///
    /// # Errors
    ///
    /// Returns `MissingSubPipeline` listing every absent name, or
    /// `DuplicateSubPipelineReference` when reuse is rejected. Either way the
    /// builder is left untouched.
    pub fn conditional_match(
        &mut self,
        condition: &str,
        then: &str,
        otherwise: &str,
        target: impl Into<Target>,
    ) -> Result<&mut Self, AggflowError> {
        let refs = [condition, then, otherwise];

        if self.config.branch_reuse == BranchReuse::Reject {
            if let Some(name) = first_repeated(&refs) {
                let err = DuplicateReferenceError::new(name);
                self.emit_rejection(&err.error_info);
                return Err(err.into());
            }
        }

        let mut missing: Vec<String> = Vec::new();
        for name in refs {
            if !self.sub_pipelines.contains(name) && !missing.iter().any(|m| m == name) {
                missing.push(name.to_string());
            }
        }
        if !missing.is_empty() {
            let err = MissingSubPipelineError::new(missing);
            self.emit_rejection(&err.error_info);
            return Err(err.into());
        }

        let mut consumed: HashMap<&str, Vec<Stage>> = HashMap::new();
        for name in refs {
            if consumed.contains_key(name) {
                continue;
            }
            if let Some(stages) = self.sub_pipelines.take(name) {
                self.events.emit(
                    SUBPIPELINE_CONSUMED,
                    Some(json!({ "name": name, "stages": stages.len() })),
                );
                consumed.insert(name, stages);
            }
        }

        let branch = |name: &str| consumed.get(name).cloned().unwrap_or_default();
        let stage = stages::conditional_match(branch(condition), branch(then), branch(otherwise));
        Ok(self.route(stage, target))
    }

    /// Computes `field` from the first matching case, in the order given.
    ///
    /// Falls back to the configured `switch_default` when no case holds.
    pub fn switch_match<I, C>(
        &mut self,
        field: impl Into<String>,
        cases: I,
        target: impl Into<Target>,
    ) -> &mut Self
    where
        I: IntoIterator<Item = C>,
        C: Into<SwitchCase>,
    {
        let default = self.config.switch_default.clone();
        self.route(stages::switch_match(field, cases, default), target)
    }

    /// Emits one `$lookup` per field that declares a relation.
    ///
    /// All lookups run concurrently; stages are emitted in the order of
    /// `fields` regardless of which lookup finishes first. Fields without a
    /// relation are skipped. Returns the attachment of every emitted lookup,
    /// ready for [`unwind_attachments`](Self::unwind_attachments).
    ///
    /// # Errors
    ///
    /// Returns `Resolver` if any lookup fails; nothing is emitted then.
    pub async fn join<I, S>(
        &mut self,
        fields: I,
        target: impl Into<Target>,
    ) -> Result<Vec<Attachment>, AggflowError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let target = target.into();
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();

        let resolver = Arc::clone(&self.resolver);
        let relations = try_join_all(fields.iter().map(|field| resolver.resolve(field))).await?;

        let mut attachments = Vec::new();
        for (field, relation) in fields.into_iter().zip(relations) {
            match relation {
                Relation::Unrelated => {
                    debug!(field = %field, "No relation declared, skipping join");
                    self.events.emit(JOIN_SKIPPED, Some(json!({ "field": field })));
                }
                Relation::Reference {
                    collection,
                    foreign_field,
                } => {
                    let attachment = self.attachment_for(&field);
                    let foreign_field = foreign_field.unwrap_or_else(|| self.config.foreign_field.clone());
                    let stage = stages::lookup(collection, field, foreign_field, attachment.clone());
                    self.route(stage, target.clone());
                    attachments.push(attachment);
                }
            }
        }

        Ok(attachments)
    }

    /// Unwinds the attachment a join produced for each of `fields`.
    ///
    /// The attachment name is derived with the same configured suffix `join`
    /// uses.
    pub fn unwind<I, S>(&mut self, fields: I, target: impl Into<Target>) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let attachments: Vec<Attachment> = fields
            .into_iter()
            .map(|field| self.attachment_for(field.as_ref()))
            .collect();
        self.unwind_attachments(&attachments, UnwindOptions::default(), target)
    }

    /// Unwinds each attachment, in order.
    pub fn unwind_attachments(
        &mut self,
        attachments: &[Attachment],
        options: UnwindOptions,
        target: impl Into<Target>,
    ) -> &mut Self {
        let target = target.into();
        for attachment in attachments {
            self.route(stages::unwind(attachment.clone(), options), target.clone());
        }
        self
    }

    /// Appends a `$group` stage.
    pub fn group(&mut self, spec: Document, target: impl Into<Target>) -> &mut Self {
        self.route(stages::group(spec), target)
    }

    /// Appends a `$project` stage.
    pub fn project(&mut self, spec: Document, target: impl Into<Target>) -> &mut Self {
        self.route(stages::project(spec), target)
    }

    /// Appends a `$sort` stage.
    pub fn sort(&mut self, spec: SortSpec, target: impl Into<Target>) -> &mut Self {
        self.route(stages::sort(spec), target)
    }

    /// Appends a `$skip` stage.
    pub fn skip(&mut self, n: u64, target: impl Into<Target>) -> &mut Self {
        self.route(stages::skip(n), target)
    }

    /// Appends a `$limit` stage.
    pub fn limit(&mut self, n: u64, target: impl Into<Target>) -> &mut Self {
        self.route(stages::limit(n), target)
    }

    /// Appends a `$facet` stage.
    pub fn facet(&mut self, spec: FacetSpec, target: impl Into<Target>) -> &mut Self {
        self.route(stages::facet(spec), target)
    }

    /// Appends an `$addFields` stage.
    pub fn add_fields(&mut self, spec: Document, target: impl Into<Target>) -> &mut Self {
        self.route(stages::add_fields(spec), target)
    }

    /// Splices the named sub-pipeline onto the main sequence and removes it.
    ///
    /// Unknown names are ignored.
    pub fn append_sub_pipeline(&mut self, name: &str) -> &mut Self {
        if let Some(stages) = self.sub_pipelines.take(name) {
            self.events.emit(
                SUBPIPELINE_SPLICED,
                Some(json!({ "name": name, "stages": stages.len() })),
            );
            self.stages.extend(stages);
        } else {
            debug!(name, "No sub-pipeline to splice");
        }
        self
    }

    /// Removes and returns the named sub-pipeline, or `None` if it does not exist.
    pub fn get_sub_pipeline(&mut self, name: &str) -> Option<Vec<Stage>> {
        let stages = self.sub_pipelines.take(name)?;
        self.events.emit(
            SUBPIPELINE_CONSUMED,
            Some(json!({ "name": name, "stages": stages.len() })),
        );
        Some(stages)
    }

    /// Returns the named sub-pipeline without removing it.
    #[must_use]
    pub fn sub_pipeline(&self, name: &str) -> Option<&[Stage]> {
        self.sub_pipelines.get(name)
    }

    /// Returns the names of sub-pipelines that hold stages, sorted.
    #[must_use]
    pub fn pending_sub_pipelines(&self) -> Vec<&str> {
        self.sub_pipelines.names()
    }

    /// Returns the main sequence.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns the number of stages in the main sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the main sequence is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns a snapshot of the main sequence.
    ///
    /// Repeatable: nothing is cleared. Sub-pipelines that were never spliced
    /// or consumed are not part of the result and are reported as a warning.
    #[must_use]
    pub fn build(&self) -> Vec<Stage> {
        if !self.sub_pipelines.is_empty() {
            warn!(
                pending = ?self.sub_pipelines.names(),
                "Building with unconsumed sub-pipelines"
            );
        }
        self.stages.clone()
    }

    /// Builds and renders every stage into its wire document.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a payload cannot be rendered.
    pub fn build_documents(&self) -> Result<Vec<Value>, AggflowError> {
        self.build()
            .iter()
            .map(|stage| stage.to_document().map_err(AggflowError::from))
            .collect()
    }

    /// Builds and renders the pipeline as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` if a payload cannot be rendered.
    pub fn to_json_pretty(&self) -> Result<String, AggflowError> {
        Ok(serde_json::to_string_pretty(&self.build())?)
    }

    fn emit_rejection(&self, info: &ErrorInfo) {
        warn!(code = %info.code, "{}", info.summary);
        self.events.emit(MATCH_REJECTED, Some(json!(info.to_dict())));
    }

    fn attachment_for(&self, field: &str) -> Attachment {
        Attachment::for_field(field, &self.config.attachment_suffix)
    }
}

fn first_repeated<'a>(names: &[&'a str]) -> Option<&'a str> {
    names
        .iter()
        .enumerate()
        .find(|&(i, name)| names[..i].contains(name))
        .map(|(_, name)| *name)
}
