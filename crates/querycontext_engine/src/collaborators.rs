//! External services the resolvers consult.
//!
//! The engine treats every collaborator as opaque: they may hit a database
//! or an index, and any failure they report is propagated unchanged. All
//! collaborators are shared across evaluations and must be `Send + Sync`.

use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use querycontext_foundation::{CategoryId, ContainerId, Result, User};
use querycontext_query::{Clause, Operand, QueryLiteral, TerminalClause};

use crate::scheme::FieldConfigScheme;

// =============================================================================
// Identifiers of collaborator-owned objects
// =============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a container group (a project category).
    ContainerGroupId
);
numeric_id!(
    /// Identifier of an attribute owned by one container (component, version).
    AttributeId
);
numeric_id!(
    /// Identifier of a select-list option.
    OptionId
);
numeric_id!(
    /// Identifier of an issue security level.
    SecurityLevelId
);
numeric_id!(
    /// Identifier of a saved filter.
    FilterId
);

/// Identifier of a workflow status.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StatusId(pub String);

impl From<&str> for StatusId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Access level for container visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Permission {
    /// May see the container and its issues.
    Browse,
}

// =============================================================================
// Operand resolution
// =============================================================================

/// Turns an operand into the literals it denotes for an actor.
pub trait OperandResolver: Send + Sync {
    /// The literals, in order, or `None` when the operand cannot be
    /// evaluated (e.g. an unknown function).
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying function implementations.
    fn values(
        &self,
        user: Option<&User>,
        operand: &Operand,
        clause: &TerminalClause,
    ) -> Result<Option<Vec<QueryLiteral>>>;
}

/// Resolves operands written as plain literals; functions yield `None`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiteralOperandResolver;

impl OperandResolver for LiteralOperandResolver {
    fn values(
        &self,
        _user: Option<&User>,
        operand: &Operand,
        _clause: &TerminalClause,
    ) -> Result<Option<Vec<QueryLiteral>>> {
        Ok(operand.literals())
    }
}

// =============================================================================
// Containers and categories
// =============================================================================

/// Which containers an actor may see.
pub trait ContainerVisibility: Send + Sync {
    /// The containers visible to `user` at `permission`.
    ///
    /// # Errors
    ///
    /// Propagates permission backend failures.
    fn visible_containers(
        &self,
        user: Option<&User>,
        permission: Permission,
    ) -> Result<BTreeSet<ContainerId>>;
}

/// Resolves container literals (keys, names, ids).
pub trait ContainerIndex: Send + Sync {
    /// Containers a literal names. Several containers may share a name.
    ///
    /// # Errors
    ///
    /// Propagates index failures.
    fn container_ids(&self, user: Option<&User>, literal: &QueryLiteral) -> Result<Vec<ContainerId>>;
}

/// Groups of containers (project categories).
pub trait ContainerGroups: Send + Sync {
    /// Groups a literal names.
    ///
    /// # Errors
    ///
    /// Propagates index failures.
    fn group_ids(&self, literal: &QueryLiteral) -> Result<Vec<ContainerGroupId>>;

    /// Members of a group; `None` asks for the containers in no group.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn containers_in(&self, group: Option<ContainerGroupId>) -> Result<BTreeSet<ContainerId>>;
}

/// Resolves category literals (issue type names, ids).
pub trait CategoryIndex: Send + Sync {
    /// Categories a literal names.
    ///
    /// # Errors
    ///
    /// Propagates index failures.
    fn category_ids(&self, user: Option<&User>, literal: &QueryLiteral) -> Result<Vec<CategoryId>>;

    /// Every category known to the system.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn all_category_ids(&self) -> Result<BTreeSet<CategoryId>>;
}

/// The categories each container offers.
pub trait ContainerCategories: Send + Sync {
    /// Categories available in `container`.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn categories_of(&self, container: ContainerId) -> Result<BTreeSet<CategoryId>>;
}

/// Attributes that belong to exactly one container (components, versions).
pub trait ContainerAttributeIndex: Send + Sync {
    /// Attributes a literal names.
    ///
    /// # Errors
    ///
    /// Propagates index failures.
    fn attribute_ids(&self, user: Option<&User>, literal: &QueryLiteral) -> Result<Vec<AttributeId>>;

    /// Every attribute of this kind.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn all_attribute_ids(&self) -> Result<BTreeSet<AttributeId>>;

    /// The container owning an attribute, if it still exists.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn owning_container(&self, attribute: AttributeId) -> Result<Option<ContainerId>>;
}

// =============================================================================
// Workflows
// =============================================================================

/// Resolves status literals.
pub trait StatusIndex: Send + Sync {
    /// Statuses a literal names.
    ///
    /// # Errors
    ///
    /// Propagates index failures.
    fn status_ids(&self, user: Option<&User>, literal: &QueryLiteral) -> Result<Vec<StatusId>>;
}

/// Workflow assignments and definitions.
pub trait WorkflowCatalog: Send + Sync {
    /// The container's category-to-workflow mapping.
    ///
    /// A `None` category is the default entry: it applies to every category
    /// of the container that has no entry of its own.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn workflow_map(&self, container: ContainerId) -> Result<Vec<(Option<CategoryId>, String)>>;

    /// Statuses linked into a workflow, or `None` if no workflow has that
    /// name. A `None` entry is a link to a status that no longer exists.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn linked_statuses(&self, workflow: &str) -> Result<Option<Vec<Option<StatusId>>>>;
}

// =============================================================================
// Custom fields
// =============================================================================

/// An option of a select list; cascading lists nest options under parents.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SelectOption {
    /// The option.
    pub id: OptionId,
    /// Its parent option, for cascading children.
    pub parent: Option<OptionId>,
}

impl SelectOption {
    /// A top-level option.
    #[must_use]
    pub fn root(id: u64) -> Self {
        Self {
            id: OptionId(id),
            parent: None,
        }
    }

    /// A child option.
    #[must_use]
    pub fn child(id: u64, parent: u64) -> Self {
        Self {
            id: OptionId(id),
            parent: Some(OptionId(parent)),
        }
    }
}

/// Configuration schemes of custom fields.
pub trait FieldConfigSchemes: Send + Sync {
    /// Every configuration scheme of the field.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn schemes(&self, field_id: &str) -> Result<Vec<FieldConfigScheme>>;
}

/// Options of select-list custom fields.
pub trait CustomFieldOptions: Send + Sync {
    /// Options available under a scheme.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn scheme_options(&self, field_id: &str, scheme: &FieldConfigScheme) -> Result<Vec<SelectOption>>;

    /// Options a literal names.
    ///
    /// # Errors
    ///
    /// Propagates index failures.
    fn option_ids(
        &self,
        user: Option<&User>,
        field_id: &str,
        literal: &QueryLiteral,
    ) -> Result<Vec<OptionId>>;
}

/// Splits cascading-select literals into chosen and excluded options.
pub trait CascadingOptionDecomposer: Send + Sync {
    /// Returns `(positive, negative)` literals.
    fn decompose(&self, literals: Vec<QueryLiteral>) -> (Vec<QueryLiteral>, Vec<QueryLiteral>);
}

/// Negative numbers encode excluded options: `-12` excludes option `12`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignedLiteralDecomposer;

impl CascadingOptionDecomposer for SignedLiteralDecomposer {
    fn decompose(&self, literals: Vec<QueryLiteral>) -> (Vec<QueryLiteral>, Vec<QueryLiteral>) {
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for literal in literals {
            match literal {
                QueryLiteral::Number(n) if n < 0 => negative.push(QueryLiteral::Number(n.saturating_neg())),
                other => positive.push(other),
            }
        }
        (positive, negative)
    }
}

// =============================================================================
// Issues, filters, security levels, validation
// =============================================================================

/// Where a concrete issue lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IssueRef {
    /// Issue id.
    pub id: i64,
    /// The issue's container.
    pub container: ContainerId,
    /// The issue's category.
    pub category: CategoryId,
}

/// Looks up issues by identity.
pub trait IssueLookup: Send + Sync {
    /// Issues with the given ids that the actor may see.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn issues_by_id(&self, user: Option<&User>, ids: &[i64]) -> Result<Vec<IssueRef>>;

    /// Issues with the given keys that the actor may see.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn issues_by_key(&self, user: Option<&User>, keys: &[String]) -> Result<Vec<IssueRef>>;

    /// Children (sub-tasks) of an issue.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn children(&self, user: Option<&User>, parent: i64) -> Result<Vec<IssueRef>>;
}

/// A stored query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFilter {
    /// Filter id.
    pub id: FilterId,
    /// Display name.
    pub name: String,
    /// The WHERE clause; `None` matches everything.
    pub clause: Option<Clause>,
}

/// Resolves filter literals.
pub trait SavedFilters: Send + Sync {
    /// Filters a literal names that the actor may see.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn filters(&self, user: Option<&User>, literal: &QueryLiteral) -> Result<Vec<SavedFilter>>;
}

/// Detects filters that reference themselves.
pub trait FilterCycleDetector: Send + Sync {
    /// Returns true if expanding `filter` would, directly or through other
    /// filters, lead back to `filter`.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn contains_cycle(&self, user: Option<&User>, filter: &SavedFilter) -> Result<bool>;
}

/// Issue security levels.
pub trait SecurityLevels: Send + Sync {
    /// Levels a literal names that the actor may see.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn level_ids(&self, user: Option<&User>, literal: &QueryLiteral) -> Result<Vec<SecurityLevelId>>;

    /// Every level the actor may see.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn visible_levels(&self, user: Option<&User>) -> Result<BTreeSet<SecurityLevelId>>;

    /// Containers whose security scheme holds the level.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    fn containers_using(&self, level: SecurityLevelId) -> Result<BTreeSet<ContainerId>>;
}

/// Validates a predicate before its context is computed.
pub trait ClauseValidator: Send + Sync {
    /// Validation messages; empty means valid.
    ///
    /// # Errors
    ///
    /// Propagates failures of the validation backend.
    fn validate(&self, user: Option<&User>, clause: &TerminalClause) -> Result<Vec<String>>;
}
