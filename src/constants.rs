//! Application constants for the ISF converter
//!
//! Section markers, reserved words, file layout defaults and the built-in
//! delimiter table for the known ISF datasets.

// =============================================================================
// Section Markers
// =============================================================================

/// Prefix shared by every section header and the end marker
pub const SECTION_PREFIX: &str = "**";

/// End-of-input marker
pub const END_MARKER: &str = "**END";

/// Section header for attribute value-type declarations
pub const ATTRIBUTES_SECTION: &str = "**ATTRIBUTES";

/// Section header for attribute preference declarations
pub const PREFERENCES_SECTION: &str = "**PREFERENCES";

/// Section header for example rows
pub const EXAMPLES_SECTION: &str = "**EXAMPLES";

// =============================================================================
// Declaration Grammar
// =============================================================================

/// Separator between attribute name and value in declaration lines
pub const DECLARATION_SEPARATOR: char = ':';

/// Marker character stripped from attribute names
pub const NAME_MARKER: char = '+';

/// Pseudo-attribute naming the decision attribute in the attributes section
pub const DECISION_KEYWORD: &str = "decision";

/// Value-type tokens with a fixed meaning
pub mod value_types {
    pub const INTEGER: &str = "integer";
    pub const CONTINUOUS: &str = "continuous";
}

// =============================================================================
// File Layout
// =============================================================================

/// Extension of ISF input files
pub const ISF_EXTENSION: &str = "isf";

/// Extension of ARFF input files
pub const ARFF_EXTENSION: &str = "arff";

/// Default input directory, relative to the working directory
pub const DEFAULT_INPUT_DIR: &str = "data/isf";

/// Default ARFF input directory, relative to the working directory
pub const DEFAULT_ARFF_INPUT_DIR: &str = "data/arff";

/// Output sub-directory names
pub const JSON_DIR_NAME: &str = "json";
pub const CSV_DIR_NAME: &str = "csv";

/// Upper bound on concurrently converted files
pub const MAX_CONCURRENT_FILES: usize = 8;

// =============================================================================
// Delimiters
// =============================================================================

/// Example-row delimiters of the known ISF datasets, keyed by file name
pub const KNOWN_DELIMITERS: &[(&str, char)] = &[
    ("balance_scale.isf", ','),
    ("breast-w.isf", '\t'),
    ("car.isf", '\t'),
    ("cpu.isf", '\t'),
    ("dataset1_noid.isf", '\t'),
    ("dataset3.isf", '\t'),
    ("denbosch.isf", '\t'),
    ("ERA_n.isf", ','),
    ("ESL_n.isf", ','),
    ("housing.isf", ','),
    ("LEV_n.isf", ','),
    ("SWD_n.isf", ','),
    ("windsor.isf", '\t'),
];

// =============================================================================
// Labelling Statistics
// =============================================================================

pub mod labelling {
    /// Field separator of labelling result files
    pub const SEPARATOR: u8 = b';';

    /// Column holding the label of an example
    pub const TYPE_COLUMN: &str = "type";

    /// Column holding the example index
    pub const INDEX_COLUMN: &str = "index";

    /// Header of the aggregated statistics files
    pub const FIELD_NAMES: &[&str] = &["name", "safe", "borderline", "rare", "outlier"];

    pub const UNION_KNN_FILE: &str = "union_knn.csv";
    pub const UNION_KERNEL_FILE: &str = "union_kernel.csv";
    pub const CLASS_KNN_FILE: &str = "class_knn.csv";
    pub const CLASS_KERNEL_FILE: &str = "class_kernel.csv";
}
