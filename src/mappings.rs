//! Source-map JSON model and `mappings` codec.
//!
//! A version-3 source map stores its line/segment table as a string of
//! base64 VLQ values: lines separated by `;`, segments within a line by `,`.
//! Within the string most fields are deltas against the previous segment —
//! the generated column resets at each line, while source index, source
//! line, source column, and name index carry across the whole run.
//!
//! The aggregator needs to splice tables from several fragment maps into one
//! merged table, shifting columns and rewriting source indices along the
//! way. That only works on absolute values, so this module decodes the delta
//! stream into an absolute [`Segment`] table and re-encodes it after the
//! merge arithmetic is done.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SourceMapJson
// ---------------------------------------------------------------------------

/// A version-3 source map object.
///
/// Used both for fragment maps handed over by the extraction side and for
/// the merged map built per chunk. Unknown fields on incoming maps (e.g.
/// `sourceRoot`) are ignored rather than rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMapJson {
    /// Always 3.
    pub version: u32,

    /// Name of the generated file this map describes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Original source paths, in source-index order.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Original source contents, parallel to `sources`. `None` entries mark
    /// sources whose content was not captured.
    #[serde(
        rename = "sourcesContent",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub sources_content: Vec<Option<String>>,

    /// Symbol names referenced by segments.
    #[serde(default)]
    pub names: Vec<String>,

    /// Base64 VLQ encoded line/segment table.
    #[serde(default)]
    pub mappings: String,
}

impl SourceMapJson {
    /// Create an empty version-3 map.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            version: 3,
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One decoded mapping segment with absolute values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Zero-based column in the generated text.
    pub generated_column: i64,
    /// Original position, absent for unmapped segments.
    pub src: Option<SegmentSrc>,
}

/// The original-position half of a mapped segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentSrc {
    /// Index into the map's `sources` list.
    pub source_index: i64,
    /// Zero-based line in the original source.
    pub source_line: i64,
    /// Zero-based column in the original source.
    pub source_column: i64,
    /// Index into the map's `names` list, if the segment names a symbol.
    pub name_index: Option<i64>,
}

/// A decoded mapping table: one entry per generated line, each holding that
/// line's segments in order.
pub type LineTable = Vec<Vec<Segment>>;

// ---------------------------------------------------------------------------
// MappingsError
// ---------------------------------------------------------------------------

/// Error produced while decoding a `mappings` string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MappingsError {
    /// A VLQ value was malformed (bad base64 digit, truncation, overflow).
    Vlq {
        /// Zero-based generated line on which decoding failed.
        line: usize,
        /// Description from the VLQ decoder.
        detail: String,
    },
    /// A segment had an impossible field count (valid counts: 1, 4, 5).
    SegmentArity {
        /// Zero-based generated line holding the segment.
        line: usize,
        /// The field count that was found.
        fields: usize,
    },
}

impl std::fmt::Display for MappingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vlq { line, detail } => {
                write!(f, "bad VLQ value on generated line {line}: {detail}")
            }
            Self::SegmentArity { line, fields } => {
                write!(
                    f,
                    "segment on generated line {line} has {fields} fields (expected 1, 4, or 5)"
                )
            }
        }
    }
}

impl std::error::Error for MappingsError {}

// ---------------------------------------------------------------------------
// decode
// ---------------------------------------------------------------------------

/// Decode a `mappings` string into an absolute line/segment table.
///
/// # Errors
/// Returns [`MappingsError`] on malformed base64 VLQ input or segments with
/// an invalid field count.
pub fn decode_mappings(mappings: &str) -> Result<LineTable, MappingsError> {
    let mut table: LineTable = Vec::new();

    // These four carry across line boundaries.
    let mut source_index = 0i64;
    let mut source_line = 0i64;
    let mut source_column = 0i64;
    let mut name_index = 0i64;

    for (line_no, line) in mappings.split(';').enumerate() {
        let mut segments: Vec<Segment> = Vec::new();
        // Generated column resets at the start of every line.
        let mut generated_column = 0i64;

        for raw in line.split(',') {
            if raw.is_empty() {
                continue;
            }
            let mut fields = [0i64; 5];
            let mut count = 0usize;
            let mut bytes = raw.bytes().peekable();
            while bytes.peek().is_some() {
                let value = vlq::decode(&mut bytes).map_err(|e| MappingsError::Vlq {
                    line: line_no,
                    detail: format!("{e:?}"),
                })?;
                if count >= 5 {
                    return Err(MappingsError::SegmentArity {
                        line: line_no,
                        fields: count + 1,
                    });
                }
                fields[count] = value;
                count += 1;
            }

            generated_column += fields[0];
            let src = match count {
                1 => None,
                4 | 5 => {
                    source_index += fields[1];
                    source_line += fields[2];
                    source_column += fields[3];
                    let name = if count == 5 {
                        name_index += fields[4];
                        Some(name_index)
                    } else {
                        None
                    };
                    Some(SegmentSrc {
                        source_index,
                        source_line,
                        source_column,
                        name_index: name,
                    })
                }
                n => {
                    return Err(MappingsError::SegmentArity {
                        line: line_no,
                        fields: n,
                    });
                }
            };
            segments.push(Segment {
                generated_column,
                src,
            });
        }
        table.push(segments);
    }

    // An empty mappings string decodes to one empty line; normalize to none.
    if table.len() == 1 && table[0].is_empty() && mappings.is_empty() {
        table.clear();
    }
    Ok(table)
}

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

/// Encode an absolute line/segment table back into a `mappings` string.
#[must_use]
pub fn encode_mappings(table: &[Vec<Segment>]) -> String {
    let mut out: Vec<u8> = Vec::new();

    let mut prev_source_index = 0i64;
    let mut prev_source_line = 0i64;
    let mut prev_source_column = 0i64;
    let mut prev_name_index = 0i64;

    for (line_no, segments) in table.iter().enumerate() {
        if line_no > 0 {
            out.push(b';');
        }
        let mut prev_generated_column = 0i64;
        for (seg_no, segment) in segments.iter().enumerate() {
            if seg_no > 0 {
                out.push(b',');
            }
            push_vlq(segment.generated_column - prev_generated_column, &mut out);
            prev_generated_column = segment.generated_column;

            if let Some(src) = segment.src {
                push_vlq(src.source_index - prev_source_index, &mut out);
                push_vlq(src.source_line - prev_source_line, &mut out);
                push_vlq(src.source_column - prev_source_column, &mut out);
                prev_source_index = src.source_index;
                prev_source_line = src.source_line;
                prev_source_column = src.source_column;
                if let Some(name) = src.name_index {
                    push_vlq(name - prev_name_index, &mut out);
                    prev_name_index = name;
                }
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn push_vlq(value: i64, out: &mut Vec<u8>) {
    // Writing to a Vec is infallible.
    let _ = vlq::encode(value, out);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_empty_is_empty_table() {
        let table = decode_mappings("").expect("empty mappings decode");
        assert!(table.is_empty());
    }

    #[test]
    fn decode_single_zero_segment() {
        // "AAAA" = four zero deltas: column 0, source 0, line 0, column 0.
        let table = decode_mappings("AAAA").expect("decode");
        assert_eq!(table.len(), 1);
        assert_eq!(
            table[0],
            vec![Segment {
                generated_column: 0,
                src: Some(SegmentSrc {
                    source_index: 0,
                    source_line: 0,
                    source_column: 0,
                    name_index: None,
                }),
            }]
        );
    }

    #[test]
    fn decode_columns_accumulate_within_line() {
        // Two segments on one line: col 0, then col +4.
        let table = decode_mappings("AAAA,IAAI").expect("decode");
        assert_eq!(table[0].len(), 2);
        assert_eq!(table[0][0].generated_column, 0);
        assert_eq!(table[0][1].generated_column, 4);
        let src = table[0][1].src.expect("mapped segment");
        assert_eq!(src.source_column, 4);
    }

    #[test]
    fn decode_source_state_carries_across_lines() {
        // Line 0 maps source line 0; line 1 starts at source line +1.
        let table = decode_mappings("AAAA;AACA").expect("decode");
        assert_eq!(table.len(), 2);
        let src = table[1][0].src.expect("mapped segment");
        assert_eq!(src.source_line, 1);
        assert_eq!(src.source_index, 0);
    }

    #[test]
    fn decode_empty_lines_are_kept() {
        let table = decode_mappings(";;AAAA").expect("decode");
        assert_eq!(table.len(), 3);
        assert!(table[0].is_empty());
        assert!(table[1].is_empty());
        assert_eq!(table[2].len(), 1);
    }

    #[test]
    fn decode_unmapped_segment() {
        let table = decode_mappings("E").expect("decode");
        assert_eq!(
            table[0],
            vec![Segment {
                generated_column: 2,
                src: None,
            }]
        );
    }

    #[test]
    fn decode_name_index() {
        // Five-field segment: includes a name delta.
        let table = decode_mappings("AAAAA").expect("decode");
        let src = table[0][0].src.expect("mapped segment");
        assert_eq!(src.name_index, Some(0));
    }

    #[test]
    fn decode_rejects_bad_arity() {
        let err = decode_mappings("AA").expect_err("two fields is invalid");
        assert!(matches!(err, MappingsError::SegmentArity { fields: 2, .. }));
    }

    #[test]
    fn decode_rejects_invalid_base64() {
        let err = decode_mappings("!").expect_err("not a base64 digit");
        assert!(matches!(err, MappingsError::Vlq { .. }));
    }

    #[test]
    fn encode_round_trips() {
        for mappings in ["AAAA", "AAAA,IAAI;;AACA", ";;AAAA", "E", "AAAAA,IAAIC"] {
            let table = decode_mappings(mappings).expect("decode");
            assert_eq!(encode_mappings(&table), mappings, "input: {mappings}");
        }
    }

    #[test]
    fn encode_empty_table() {
        assert_eq!(encode_mappings(&[]), "");
    }

    #[test]
    fn error_display() {
        let err = MappingsError::SegmentArity { line: 3, fields: 2 };
        assert!(format!("{err}").contains("line 3"));
        let err = MappingsError::Vlq {
            line: 0,
            detail: "truncated".to_owned(),
        };
        assert!(format!("{err}").contains("truncated"));
    }

    #[test]
    fn source_map_json_serde_field_names() {
        let map = SourceMapJson {
            version: 3,
            file: Some("out.css".to_owned()),
            sources: vec!["a.css".to_owned()],
            sources_content: vec![Some(".a{}".to_owned())],
            names: vec![],
            mappings: "AAAA".to_owned(),
        };
        let json = serde_json::to_value(&map).expect("serialize");
        assert_eq!(json["version"], 3);
        assert!(json.get("sourcesContent").is_some());
        assert!(json.get("sources_content").is_none());
    }

    #[test]
    fn source_map_json_ignores_unknown_fields() {
        let map: SourceMapJson = serde_json::from_str(
            r#"{"version":3,"sources":["a.css"],"sourceRoot":"","mappings":"AAAA","names":[]}"#,
        )
        .expect("parse with sourceRoot");
        assert_eq!(map.sources, vec!["a.css"]);
    }

    #[test]
    fn empty_sources_content_is_omitted_on_serialize() {
        let map = SourceMapJson::empty();
        let json = serde_json::to_value(&map).expect("serialize");
        assert!(json.get("sourcesContent").is_none());
    }
}
