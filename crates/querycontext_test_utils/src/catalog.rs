//! An in-memory tracker implementing every engine collaborator.
//!
//! Build one with [`InMemoryCatalog::builder`]:
//!
//! ```ignore
//! let catalog = InMemoryCatalog::builder()
//!     .issue_type("1", "Bug")
//!     .project(TestProject::new(10, "A", "Alpha").with_issue_types(["1"]))
//!     .build();
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use querycontext_engine::collaborators::{
    AttributeId, CategoryIndex, ClauseValidator, ContainerAttributeIndex, ContainerCategories,
    ContainerGroupId, ContainerGroups, ContainerIndex, ContainerVisibility, CustomFieldOptions,
    FieldConfigSchemes, FilterCycleDetector, FilterId, IssueLookup, IssueRef, OptionId, Permission,
    SavedFilter, SavedFilters, SecurityLevelId, SecurityLevels, SelectOption, StatusId, StatusIndex,
    WorkflowCatalog,
};
use querycontext_engine::{ClauseNames, FieldConfigScheme};
use querycontext_foundation::{CategoryId, ContainerId, Result, User};
use querycontext_query::{Clause, QueryLiteral, TerminalClause};

/// Clause names that reference saved filters.
const FILTER_CLAUSE_NAMES: [&str; 3] = ["filter", "savedfilter", "request"];

fn names_match(literal: &QueryLiteral, name: &str, id: &str) -> bool {
    match literal {
        QueryLiteral::Str(s) => s.eq_ignore_ascii_case(name),
        QueryLiteral::Number(n) => n.to_string() == id,
        QueryLiteral::Empty => false,
    }
}

// =============================================================================
// Catalog entries
// =============================================================================

/// A project.
#[derive(Clone, Debug)]
pub struct TestProject {
    /// Project id.
    pub id: ContainerId,
    /// Project key, e.g. `HSP`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Project category.
    pub group: Option<ContainerGroupId>,
    /// Issue types the project offers.
    pub issue_types: BTreeSet<CategoryId>,
    /// Issue type to workflow mapping; `None` is the default entry.
    pub workflows: Vec<(Option<CategoryId>, String)>,
    /// Security levels of the project's scheme.
    pub security_levels: BTreeSet<SecurityLevelId>,
    /// Users allowed to browse; `None` means everyone.
    pub members: Option<BTreeSet<String>>,
}

impl TestProject {
    /// A public project with no issue types.
    #[must_use]
    pub fn new(id: u64, key: &str, name: &str) -> Self {
        Self {
            id: ContainerId::new(id),
            key: key.to_string(),
            name: name.to_string(),
            group: None,
            issue_types: BTreeSet::new(),
            workflows: Vec::new(),
            security_levels: BTreeSet::new(),
            members: None,
        }
    }

    /// Places the project in a project category.
    #[must_use]
    pub fn in_group(mut self, group: u64) -> Self {
        self.group = Some(ContainerGroupId(group));
        self
    }

    /// Sets the issue types.
    #[must_use]
    pub fn with_issue_types<C: Into<CategoryId>>(mut self, types: impl IntoIterator<Item = C>) -> Self {
        self.issue_types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a workflow mapping entry.
    #[must_use]
    pub fn with_workflow(mut self, issue_type: Option<&str>, workflow: &str) -> Self {
        self.workflows.push((issue_type.map(CategoryId::from), workflow.to_string()));
        self
    }

    /// Sets the security levels.
    #[must_use]
    pub fn with_security_levels(mut self, levels: impl IntoIterator<Item = u64>) -> Self {
        self.security_levels = levels.into_iter().map(SecurityLevelId).collect();
        self
    }

    /// Only the named users may browse the project.
    #[must_use]
    pub fn restricted_to<S: Into<String>>(mut self, users: impl IntoIterator<Item = S>) -> Self {
        self.members = Some(users.into_iter().map(Into::into).collect());
        self
    }

    fn visible_to(&self, user: Option<&User>) -> bool {
        match &self.members {
            None => true,
            Some(members) => user.is_some_and(|user| members.contains(user.name())),
        }
    }
}

/// How a custom field is searched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomFieldKind {
    /// Single or multi select list.
    Select,
    /// Two-level cascading select list.
    Cascading,
    /// Free text, contributing to `text ~` searches.
    Text,
}

/// A custom field and its configuration schemes.
#[derive(Clone, Debug)]
pub struct CustomField {
    number: u64,
    /// Display name, usable as a clause name.
    pub name: String,
    /// Searcher kind.
    pub kind: CustomFieldKind,
    /// Configuration schemes.
    pub schemes: Vec<FieldConfigScheme>,
    /// Options per scheme id, with their display values.
    pub options: BTreeMap<u64, Vec<(SelectOption, String)>>,
}

impl CustomField {
    /// A field with no schemes.
    #[must_use]
    pub fn new(number: u64, name: &str, kind: CustomFieldKind) -> Self {
        Self {
            number,
            name: name.to_string(),
            kind,
            schemes: Vec::new(),
            options: BTreeMap::new(),
        }
    }

    /// Adds a scheme offering `options`.
    #[must_use]
    pub fn with_scheme<'a>(
        mut self,
        scheme: FieldConfigScheme,
        options: impl IntoIterator<Item = (SelectOption, &'a str)>,
    ) -> Self {
        self.options.insert(
            scheme.id,
            options.into_iter().map(|(option, value)| (option, value.to_string())).collect(),
        );
        self.schemes.push(scheme);
        self
    }

    /// The field id, e.g. `customfield_10000`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("customfield_{}", self.number)
    }

    /// `cf[10000]`, aliased by the display name.
    #[must_use]
    pub fn clause_names(&self) -> ClauseNames {
        ClauseNames::new(format!("cf[{}]", self.number)).with_alias(self.name.clone())
    }

    fn answers_to(&self, clause_name: &str) -> bool {
        self.clause_names().all().any(|name| name.eq_ignore_ascii_case(clause_name))
    }

    fn values(&self) -> impl Iterator<Item = &(SelectOption, String)> {
        self.options.values().flatten()
    }
}

/// An issue.
#[derive(Clone, Debug)]
pub struct TestIssue {
    /// Where it lives.
    pub issue: IssueRef,
    /// Issue key, e.g. `HSP-1`.
    pub key: String,
    /// Parent issue id, for sub-tasks.
    pub parent: Option<i64>,
}

impl TestIssue {
    /// A top-level issue.
    #[must_use]
    pub fn new(id: i64, key: &str, project: u64, issue_type: &str) -> Self {
        Self {
            issue: IssueRef {
                id,
                container: ContainerId::new(project),
                category: CategoryId::from(issue_type),
            },
            key: key.to_string(),
            parent: None,
        }
    }

    /// Makes the issue a sub-task of `parent`.
    #[must_use]
    pub fn child_of(mut self, parent: i64) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Attributes owned by one project each, such as components or versions.
#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
    entries: Vec<(AttributeId, String, ContainerId)>,
}

impl ContainerAttributeIndex for AttributeTable {
    fn attribute_ids(&self, _: Option<&User>, literal: &QueryLiteral) -> Result<Vec<AttributeId>> {
        Ok(self
            .entries
            .iter()
            .filter(|(id, name, _)| names_match(literal, name, &id.to_string()))
            .map(|(id, _, _)| *id)
            .collect())
    }

    fn all_attribute_ids(&self) -> Result<BTreeSet<AttributeId>> {
        Ok(self.entries.iter().map(|(id, _, _)| *id).collect())
    }

    fn owning_container(&self, attribute: AttributeId) -> Result<Option<ContainerId>> {
        Ok(self
            .entries
            .iter()
            .find(|(id, _, _)| *id == attribute)
            .map(|(_, _, owner)| *owner))
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// An in-memory tracker.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCatalog {
    projects: BTreeMap<ContainerId, TestProject>,
    groups: Vec<(ContainerGroupId, String)>,
    issue_types: Vec<(CategoryId, String)>,
    components: Arc<AttributeTable>,
    versions: Arc<AttributeTable>,
    statuses: Vec<(StatusId, String)>,
    workflows: BTreeMap<String, Vec<Option<StatusId>>>,
    custom_fields: Vec<CustomField>,
    issues: Vec<TestIssue>,
    filters: Vec<SavedFilter>,
    levels: Vec<(SecurityLevelId, String)>,
}

impl InMemoryCatalog {
    /// Starts an empty catalog.
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The components table.
    #[must_use]
    pub fn components(&self) -> Arc<AttributeTable> {
        Arc::clone(&self.components)
    }

    /// The versions table.
    #[must_use]
    pub fn versions(&self) -> Arc<AttributeTable> {
        Arc::clone(&self.versions)
    }

    /// The custom fields.
    #[must_use]
    pub fn custom_fields(&self) -> &[CustomField] {
        &self.custom_fields
    }

    fn custom_field(&self, field_id: &str) -> Option<&CustomField> {
        self.custom_fields.iter().find(|field| field.id() == field_id)
    }

    fn visible_issues<'a>(&'a self, user: Option<&'a User>) -> impl Iterator<Item = &'a TestIssue> + 'a {
        self.issues.iter().filter(move |issue| {
            self.projects
                .get(&issue.issue.container)
                .is_some_and(|project| project.visible_to(user))
        })
    }

    /// Saved filters referenced anywhere in `clause`.
    fn referenced_filters(&self, user: Option<&User>, clause: &Clause) -> Result<Vec<SavedFilter>> {
        let mut terminals = Vec::new();
        collect_terminals(clause, &mut terminals);
        let mut referenced = Vec::new();
        for terminal in terminals {
            if !FILTER_CLAUSE_NAMES
                .iter()
                .any(|name| name.eq_ignore_ascii_case(terminal.name()))
            {
                continue;
            }
            for literal in terminal.operand().literals().unwrap_or_default() {
                referenced.extend(self.filters(user, &literal)?);
            }
        }
        Ok(referenced)
    }
}

fn collect_terminals<'a>(clause: &'a Clause, out: &mut Vec<&'a TerminalClause>) {
    match clause {
        Clause::And(children) | Clause::Or(children) => {
            for child in children {
                collect_terminals(child, out);
            }
        }
        Clause::Not(child) => collect_terminals(child, out),
        Clause::Terminal(terminal) => out.push(terminal),
        Clause::Was(_) | Clause::Changed(_) => {}
    }
}

/// Fluent builder for [`InMemoryCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: InMemoryCatalog,
    components: AttributeTable,
    versions: AttributeTable,
}

impl CatalogBuilder {
    /// Adds a project.
    #[must_use]
    pub fn project(mut self, project: TestProject) -> Self {
        self.catalog.projects.insert(project.id, project);
        self
    }

    /// Adds a project category.
    #[must_use]
    pub fn group(mut self, id: u64, name: &str) -> Self {
        self.catalog.groups.push((ContainerGroupId(id), name.to_string()));
        self
    }

    /// Adds an issue type.
    #[must_use]
    pub fn issue_type(mut self, id: &str, name: &str) -> Self {
        self.catalog.issue_types.push((CategoryId::from(id), name.to_string()));
        self
    }

    /// Adds a component of `project`.
    #[must_use]
    pub fn component(mut self, id: u64, name: &str, project: u64) -> Self {
        self.components
            .entries
            .push((AttributeId(id), name.to_string(), ContainerId::new(project)));
        self
    }

    /// Adds a version of `project`.
    #[must_use]
    pub fn version(mut self, id: u64, name: &str, project: u64) -> Self {
        self.versions
            .entries
            .push((AttributeId(id), name.to_string(), ContainerId::new(project)));
        self
    }

    /// Adds a status.
    #[must_use]
    pub fn status(mut self, id: &str, name: &str) -> Self {
        self.catalog.statuses.push((StatusId::from(id), name.to_string()));
        self
    }

    /// Defines a workflow linking the given status ids.
    #[must_use]
    pub fn workflow(mut self, name: &str, statuses: &[&str]) -> Self {
        self.catalog.workflows.insert(
            name.to_string(),
            statuses.iter().map(|&id| Some(StatusId::from(id))).collect(),
        );
        self
    }

    /// Adds a link to a status that no longer exists.
    #[must_use]
    pub fn dangling_status_link(mut self, workflow: &str) -> Self {
        self.catalog.workflows.entry(workflow.to_string()).or_default().push(None);
        self
    }

    /// Adds a custom field.
    #[must_use]
    pub fn custom_field(mut self, field: CustomField) -> Self {
        self.catalog.custom_fields.push(field);
        self
    }

    /// Adds an issue.
    #[must_use]
    pub fn issue(mut self, issue: TestIssue) -> Self {
        self.catalog.issues.push(issue);
        self
    }

    /// Adds a saved filter.
    #[must_use]
    pub fn filter(mut self, id: u64, name: &str, clause: Option<Clause>) -> Self {
        self.catalog.filters.push(SavedFilter {
            id: FilterId(id),
            name: name.to_string(),
            clause,
        });
        self
    }

    /// Adds a security level.
    #[must_use]
    pub fn security_level(mut self, id: u64, name: &str) -> Self {
        self.catalog.levels.push((SecurityLevelId(id), name.to_string()));
        self
    }

    /// Finishes the catalog.
    #[must_use]
    pub fn build(self) -> InMemoryCatalog {
        InMemoryCatalog {
            components: Arc::new(self.components),
            versions: Arc::new(self.versions),
            ..self.catalog
        }
    }
}

// =============================================================================
// Collaborator implementations
// =============================================================================

impl ContainerVisibility for InMemoryCatalog {
    fn visible_containers(&self, user: Option<&User>, _: Permission) -> Result<BTreeSet<ContainerId>> {
        Ok(self
            .projects
            .values()
            .filter(|project| project.visible_to(user))
            .map(|project| project.id)
            .collect())
    }
}

impl ContainerIndex for InMemoryCatalog {
    fn container_ids(&self, _: Option<&User>, literal: &QueryLiteral) -> Result<Vec<ContainerId>> {
        Ok(self
            .projects
            .values()
            .filter(|project| {
                names_match(literal, &project.key, &project.id.to_string())
                    || names_match(literal, &project.name, &project.id.to_string())
            })
            .map(|project| project.id)
            .collect())
    }
}

impl ContainerGroups for InMemoryCatalog {
    fn group_ids(&self, literal: &QueryLiteral) -> Result<Vec<ContainerGroupId>> {
        Ok(self
            .groups
            .iter()
            .filter(|(id, name)| names_match(literal, name, &id.to_string()))
            .map(|(id, _)| *id)
            .collect())
    }

    fn containers_in(&self, group: Option<ContainerGroupId>) -> Result<BTreeSet<ContainerId>> {
        Ok(self
            .projects
            .values()
            .filter(|project| project.group == group)
            .map(|project| project.id)
            .collect())
    }
}

impl CategoryIndex for InMemoryCatalog {
    fn category_ids(&self, _: Option<&User>, literal: &QueryLiteral) -> Result<Vec<CategoryId>> {
        Ok(self
            .issue_types
            .iter()
            .filter(|(id, name)| names_match(literal, name, id.as_str()))
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn all_category_ids(&self) -> Result<BTreeSet<CategoryId>> {
        Ok(self.issue_types.iter().map(|(id, _)| id.clone()).collect())
    }
}

impl ContainerCategories for InMemoryCatalog {
    fn categories_of(&self, container: ContainerId) -> Result<BTreeSet<CategoryId>> {
        Ok(self
            .projects
            .get(&container)
            .map(|project| project.issue_types.clone())
            .unwrap_or_default())
    }
}

impl StatusIndex for InMemoryCatalog {
    fn status_ids(&self, _: Option<&User>, literal: &QueryLiteral) -> Result<Vec<StatusId>> {
        Ok(self
            .statuses
            .iter()
            .filter(|(id, name)| names_match(literal, name, &id.0))
            .map(|(id, _)| id.clone())
            .collect())
    }
}

impl WorkflowCatalog for InMemoryCatalog {
    fn workflow_map(&self, container: ContainerId) -> Result<Vec<(Option<CategoryId>, String)>> {
        Ok(self
            .projects
            .get(&container)
            .map(|project| project.workflows.clone())
            .unwrap_or_default())
    }

    fn linked_statuses(&self, workflow: &str) -> Result<Option<Vec<Option<StatusId>>>> {
        Ok(self.workflows.get(workflow).cloned())
    }
}

impl FieldConfigSchemes for InMemoryCatalog {
    fn schemes(&self, field_id: &str) -> Result<Vec<FieldConfigScheme>> {
        Ok(self
            .custom_field(field_id)
            .map(|field| field.schemes.clone())
            .unwrap_or_default())
    }
}

impl CustomFieldOptions for InMemoryCatalog {
    fn scheme_options(&self, field_id: &str, scheme: &FieldConfigScheme) -> Result<Vec<SelectOption>> {
        Ok(self
            .custom_field(field_id)
            .and_then(|field| field.options.get(&scheme.id))
            .map(|options| options.iter().map(|(option, _)| option.clone()).collect())
            .unwrap_or_default())
    }

    fn option_ids(&self, _: Option<&User>, field_id: &str, literal: &QueryLiteral) -> Result<Vec<OptionId>> {
        let Some(field) = self.custom_field(field_id) else {
            return Ok(Vec::new());
        };
        let ids: BTreeSet<OptionId> = field
            .values()
            .filter(|(option, value)| match literal {
                // A negative number addresses the option for exclusion.
                QueryLiteral::Number(n) => n.unsigned_abs() == option.id.0,
                _ => names_match(literal, value, ""),
            })
            .map(|(option, _)| option.id)
            .collect();
        Ok(ids.into_iter().collect())
    }
}

impl IssueLookup for InMemoryCatalog {
    fn issues_by_id(&self, user: Option<&User>, ids: &[i64]) -> Result<Vec<IssueRef>> {
        Ok(self
            .visible_issues(user)
            .filter(|issue| ids.contains(&issue.issue.id))
            .map(|issue| issue.issue.clone())
            .collect())
    }

    fn issues_by_key(&self, user: Option<&User>, keys: &[String]) -> Result<Vec<IssueRef>> {
        Ok(self
            .visible_issues(user)
            .filter(|issue| keys.iter().any(|key| key.eq_ignore_ascii_case(&issue.key)))
            .map(|issue| issue.issue.clone())
            .collect())
    }

    fn children(&self, user: Option<&User>, parent: i64) -> Result<Vec<IssueRef>> {
        Ok(self
            .visible_issues(user)
            .filter(|issue| issue.parent == Some(parent))
            .map(|issue| issue.issue.clone())
            .collect())
    }
}

impl SavedFilters for InMemoryCatalog {
    fn filters(&self, _: Option<&User>, literal: &QueryLiteral) -> Result<Vec<SavedFilter>> {
        Ok(self
            .filters
            .iter()
            .filter(|filter| names_match(literal, &filter.name, &filter.id.to_string()))
            .cloned()
            .collect())
    }
}

impl FilterCycleDetector for InMemoryCatalog {
    fn contains_cycle(&self, user: Option<&User>, filter: &SavedFilter) -> Result<bool> {
        let Some(clause) = &filter.clause else {
            return Ok(false);
        };
        let mut seen = BTreeSet::new();
        let mut pending = self.referenced_filters(user, clause)?;
        while let Some(next) = pending.pop() {
            if next.id == filter.id {
                return Ok(true);
            }
            if !seen.insert(next.id) {
                continue;
            }
            if let Some(clause) = &next.clause {
                pending.extend(self.referenced_filters(user, clause)?);
            }
        }
        Ok(false)
    }
}

impl SecurityLevels for InMemoryCatalog {
    fn level_ids(&self, _: Option<&User>, literal: &QueryLiteral) -> Result<Vec<SecurityLevelId>> {
        Ok(self
            .levels
            .iter()
            .filter(|(id, name)| names_match(literal, name, &id.to_string()))
            .map(|(id, _)| *id)
            .collect())
    }

    fn visible_levels(&self, _: Option<&User>) -> Result<BTreeSet<SecurityLevelId>> {
        Ok(self.levels.iter().map(|(id, _)| *id).collect())
    }

    fn containers_using(&self, level: SecurityLevelId) -> Result<BTreeSet<ContainerId>> {
        Ok(self
            .projects
            .values()
            .filter(|project| project.security_levels.contains(&level))
            .map(|project| project.id)
            .collect())
    }
}

impl ClauseValidator for InMemoryCatalog {
    /// Rejects select-list values that name no option of the field.
    fn validate(&self, _: Option<&User>, clause: &TerminalClause) -> Result<Vec<String>> {
        let Some(field) = self
            .custom_fields
            .iter()
            .find(|field| field.kind != CustomFieldKind::Text && field.answers_to(clause.name()))
        else {
            return Ok(Vec::new());
        };
        Ok(clause
            .operand()
            .literals()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|literal| match literal {
                QueryLiteral::Str(value) if !field.values().any(|(_, known)| known.eq_ignore_ascii_case(&value)) => {
                    Some(format!("The option '{value}' for field '{}' does not exist.", field.name))
                }
                _ => None,
            })
            .collect())
    }
}
