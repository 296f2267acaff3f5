/*!
 * Speech markup parsing.
 *
 * - `parser`: tree walk producing clean text and a directive timeline
 * - `attributes`: value grammars and keyword tables for tag attributes
 * - `accumulator`: incremental clean-text builder used by the walk
 */

mod accumulator;
pub mod attributes;
pub mod parser;

pub use parser::{parse, MarkupParser, ParsedMarkup, ROOT_TAG, SSML_NAMESPACE};
