//! Per-construct cost weights.
//!
//! Each constant approximates the instructions emitted for the construct
//! itself, excluding its children.

// Leaves
pub const NUMBER: u32 = 5;
pub const STRING: u32 = 6;
/// Extra load per `STRING_CHUNK` piece of an oversized string literal.
pub const STRING_PIECE: u32 = 20;
pub const KEYWORD: u32 = 5;
pub const IDENT: u32 = 7;
pub const BIGINT: u32 = 8;
pub const REGEXP: u32 = 15;
pub const HOLE: u32 = 0;
pub const META: u32 = 5;

// Operators
pub const UNARY: u32 = 2;
pub const UPDATE: u32 = 8;
pub const BINARY: u32 = 10;
pub const LOGICAL: u32 = 15;
pub const ASSIGN: u32 = 10;
pub const CONDITIONAL: u32 = 15;
pub const SEQUENCE: u32 = 2;
pub const SEQUENCE_ITEM: u32 = 2;

// Access and calls
pub const MEMBER: u32 = 5;
pub const INDEX: u32 = 6;
/// Null check of `?.`.
pub const OPTIONAL: u32 = 5;
pub const CALL: u32 = 15;
pub const ARG: u32 = 3;
pub const NEW: u32 = 20;
pub const SPREAD: u32 = 10;
pub const IMPORT_CALL: u32 = 20;

// Collections
pub const ARRAY: u32 = 10;
pub const ARRAY_ITEM: u32 = 5;
pub const OBJECT: u32 = 10;
pub const PROPERTY: u32 = 6;
pub const TEMPLATE: u32 = 10;
pub const TEMPLATE_PART: u32 = 3;
pub const TAGGED_TEMPLATE: u32 = 20;

// Suspension
pub const YIELD: u32 = 150;
pub const YIELD_DELEGATE: u32 = 250;
pub const AWAIT: u32 = 200;

// Closures. Bodies are separate units; the parent pays for creation only.
pub const FUNCTION: u32 = 20;
pub const CLASS: u32 = 30;
pub const CLASS_MEMBER: u32 = 8;
pub const FIELD: u32 = 5;

// Statements
pub const EXPR_STMT: u32 = 2;
pub const VAR: u32 = 2;
pub const DECLARATOR: u32 = 5;
pub const IF: u32 = 10;
pub const WHILE: u32 = 20;
pub const DO_WHILE: u32 = 20;
pub const FOR: u32 = 30;
/// Iterator protocol setup and per-step bookkeeping.
pub const FOR_IN: u32 = 150;
pub const FOR_OF: u32 = 150;
pub const FOR_AWAIT: u32 = 300;
pub const SWITCH: u32 = 20;
pub const CASE: u32 = 10;
pub const JUMP: u32 = 5;
pub const RETURN: u32 = 5;
pub const THROW: u32 = 10;
pub const TRY: u32 = 50;
pub const CATCH: u32 = 20;
pub const FINALLY: u32 = 30;
pub const WITH: u32 = 40;
pub const DEBUGGER: u32 = 5;
pub const MODULE_ITEM: u32 = 10;
