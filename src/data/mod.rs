/// Data layer: core types, validation, type recovery and spreadsheet I/O.
///
/// Architecture:
/// ```text
///   raw text fields              .xlsx / .csv
///        │                            │
///        ▼                            ▼
///   ┌──────────┐              ┌─────────────┐
///   │ builder  │  validate     │ spreadsheet │  read → Workbook
///   └──────────┘              └─────────────┘
///        │                            ▲
///        ▼                            │ write (after infer)
///   ┌──────────┐              ┌─────────────┐
///   │ Dataset  │ ───────────▶ │    infer    │  per-column Integer/Float/Text
///   └──────────┘              └─────────────┘
/// ```

pub mod builder;
pub mod infer;
pub mod model;
pub mod sample;
pub mod spreadsheet;
