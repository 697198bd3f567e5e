//! Textual affine parameter blocks.
//!
//! The encoding is the interchange format with spatial-reference metadata:
//! a `PARAM_MT["Affine", ...]` block carrying `num_row`, `num_col` and the six
//! `elt_<row>_<col>` entries, optionally wrapped in `INVERSE_MT[...]`.
//! Matrix rows are `[a1 a2 a0]` and `[a4 a5 a3]`.

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::iterators::Pair;

use crate::errors::TextError;
use crate::{AffineTextParser, Rule};

use super::Coefficients;

/// Decimal places written for each coefficient.
pub const TEXT_PRECISION: usize = 12;

const NUM_ROW: u32 = 2;
const NUM_COL: u32 = 3;

/// `elt_<row>_<col>` names in matrix order, with the coefficient index each
/// one fills.
const ELEMENTS: [(&str, usize); 6] = [
    ("elt_0_0", 1),
    ("elt_0_1", 2),
    ("elt_0_2", 0),
    ("elt_1_0", 4),
    ("elt_1_1", 5),
    ("elt_1_2", 3),
];

/// Parse a parameter block into coefficients plus whether an odd number of
/// `INVERSE_MT` wrappers surrounded it.
pub(crate) fn parse(text: &str) -> Result<(Coefficients, bool), TextError> {
    let ctx = Ctx { text };
    let mut pairs = AffineTextParser::parse(Rule::transform, text).map_err(|e| ctx.syntax(e))?;

    let transform = ctx.child(pairs.next(), 0)?;
    let mut node = ctx.child(transform.into_inner().next(), 0)?;
    let mut inverted = false;
    loop {
        let span = node.as_span();
        let inner = ctx.child(node.into_inner().next(), span.start())?;
        match inner.as_rule() {
            Rule::inverse_mt => {
                inverted = !inverted;
                let start = inner.as_span().start();
                node = ctx.child(inner.into_inner().next(), start)?;
            }
            Rule::param_mt => return Ok((parse_param_mt(&ctx, inner)?, inverted)),
            other => return Err(ctx.unexpected(other, &inner)),
        }
    }
}

/// Encode coefficients as a plain `PARAM_MT` block.
pub(crate) fn write(c: &Coefficients) -> String {
    let mut out = String::from("PARAM_MT[\"Affine\"");
    out.push_str(&format!(",PARAMETER[\"num_row\",{NUM_ROW}]"));
    out.push_str(&format!(",PARAMETER[\"num_col\",{NUM_COL}]"));
    for (name, index) in ELEMENTS {
        out.push_str(&format!(",PARAMETER[\"{name}\",{}]", fixed(c[index])));
    }
    out.push(']');
    out
}

/// Encode coefficients wrapped in a single `INVERSE_MT`.
pub(crate) fn write_inverse(c: &Coefficients) -> String {
    format!("INVERSE_MT[{}]", write(c))
}

fn fixed(v: f64) -> String {
    // Keep "-0.000..." out of the output
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{:.*}", TEXT_PRECISION, v)
}

fn parse_param_mt(ctx: &Ctx<'_>, pair: Pair<'_, Rule>) -> Result<Coefficients, TextError> {
    let block = pair.as_span();
    let mut inner = pair.into_inner();

    let name_pair = ctx.child(inner.next(), block.start())?;
    let name = name_pair.as_str().trim_matches('"');
    if !name.eq_ignore_ascii_case("Affine") {
        return Err(TextError::UnsupportedTransform {
            name: name.to_string(),
            src: ctx.source(),
            span: span_of(&name_pair),
        });
    }

    let mut rows = None;
    let mut cols = None;
    let mut elements: [Option<f64>; 6] = [None; 6];

    for param in inner {
        let param_span = span_of(&param);
        let mut parts = param.into_inner();
        let key_pair = ctx.child(parts.next(), param_span.offset())?;
        let value_pair = ctx.child(parts.next(), param_span.offset())?;
        let key = key_pair.as_str().trim_matches('"');
        let value = parse_number(ctx, &value_pair)?;

        let slot = match key {
            "num_row" => {
                check_shape(ctx, "num_row", NUM_ROW, value, &value_pair)?;
                &mut rows
            }
            "num_col" => {
                check_shape(ctx, "num_col", NUM_COL, value, &value_pair)?;
                &mut cols
            }
            _ => match ELEMENTS.iter().position(|(n, _)| *n == key) {
                Some(i) => &mut elements[i],
                None => {
                    return Err(TextError::UnknownParameter {
                        name: key.to_string(),
                        src: ctx.source(),
                        span: span_of(&key_pair),
                    });
                }
            },
        };
        if slot.replace(value).is_some() {
            return Err(TextError::DuplicateParameter {
                name: key.to_string(),
                src: ctx.source(),
                span: param_span,
            });
        }
    }

    let block_span = SourceSpan::from((block.start(), block.end() - block.start()));
    let missing = |name: &str| TextError::MissingParameter {
        name: name.to_string(),
        src: ctx.source(),
        span: block_span,
    };
    if rows.is_none() {
        return Err(missing("num_row"));
    }
    if cols.is_none() {
        return Err(missing("num_col"));
    }

    let mut coefficients = [0.0; 6];
    for ((name, index), value) in ELEMENTS.iter().zip(elements) {
        coefficients[*index] = value.ok_or_else(|| missing(name))?;
    }
    Ok(coefficients)
}

fn parse_number(ctx: &Ctx<'_>, pair: &Pair<'_, Rule>) -> Result<f64, TextError> {
    pair.as_str()
        .parse::<f64>()
        .map_err(|_| TextError::InvalidNumber {
            text: pair.as_str().to_string(),
            src: ctx.source(),
            span: span_of(pair),
        })
}

fn check_shape(
    ctx: &Ctx<'_>,
    param: &'static str,
    expected: u32,
    found: f64,
    pair: &Pair<'_, Rule>,
) -> Result<(), TextError> {
    if found == f64::from(expected) {
        Ok(())
    } else {
        Err(TextError::WrongShape {
            param,
            expected,
            found,
            src: ctx.source(),
            span: span_of(pair),
        })
    }
}

fn span_of(pair: &Pair<'_, Rule>) -> SourceSpan {
    let span = pair.as_span();
    SourceSpan::from((span.start(), span.end() - span.start()))
}

/// Source text carried into every diagnostic.
struct Ctx<'a> {
    text: &'a str,
}

impl<'a> Ctx<'a> {
    fn source(&self) -> NamedSource<String> {
        NamedSource::new("affine", self.text.to_string())
    }

    fn syntax(&self, e: pest::error::Error<Rule>) -> TextError {
        let span = match e.location {
            pest::error::InputLocation::Pos(p) => SourceSpan::from((p, 0)),
            pest::error::InputLocation::Span((s, end)) => SourceSpan::from((s, end - s)),
        };
        TextError::Syntax {
            message: e.variant.message().into_owned(),
            src: self.source(),
            span,
        }
    }

    /// A child the grammar promises; a missing one is reported as a syntax
    /// error at `at` rather than a panic.
    fn child<'i>(&self, pair: Option<Pair<'i, Rule>>, at: usize) -> Result<Pair<'i, Rule>, TextError> {
        pair.ok_or_else(|| TextError::Syntax {
            message: "incomplete parameter block".to_string(),
            src: self.source(),
            span: SourceSpan::from((at, 0)),
        })
    }

    fn unexpected(&self, rule: Rule, pair: &Pair<'_, Rule>) -> TextError {
        TextError::Syntax {
            message: format!("unexpected {rule:?}"),
            src: self.source(),
            span: span_of(pair),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEO: Coefficients = [10.0, 2.0, 0.0, 20.0, 0.0, -3.0];

    #[test]
    fn write_then_parse() {
        let text = write(&GEO);
        let (coefficients, inverted) = parse(&text).unwrap();
        assert_eq!(coefficients, GEO);
        assert!(!inverted);
    }

    #[test]
    fn nested_inverse_wrappers_toggle() {
        let inner = write(&GEO);
        let once = format!("INVERSE_MT[{inner}]");
        let twice = format!("INVERSE_MT[{once}]");
        assert!(parse(&once).unwrap().1);
        assert!(!parse(&twice).unwrap().1);
    }

    #[test]
    fn accepts_whitespace_parentheses_and_any_order() {
        let text = r#"
            param_mt("Affine",
                PARAMETER["elt_1_2", 20],
                PARAMETER["num_col", 3],
                PARAMETER["elt_0_0", 2.0],
                PARAMETER["elt_0_1", 0],
                PARAMETER["elt_0_2", 1e1],
                PARAMETER["elt_1_0", -0.0],
                PARAMETER["elt_1_1", -3],
                PARAMETER["num_row", 2])
        "#;
        assert_eq!(parse(text).unwrap().0, GEO);
    }

    #[test]
    fn fixed_precision() {
        assert_eq!(fixed(1.5), "1.500000000000");
        assert_eq!(fixed(-0.0), "0.000000000000");
        assert_eq!(fixed(1.0 / 3.0), "0.333333333333");
    }

    #[test]
    fn rejects_wrong_row_count() {
        let text = write(&GEO).replace("\"num_row\",2", "\"num_row\",3");
        assert!(matches!(
            parse(&text),
            Err(TextError::WrongShape { param: "num_row", expected: 2, .. })
        ));
    }

    #[test]
    fn rejects_missing_coefficient() {
        let text = write(&GEO).replace(",PARAMETER[\"elt_1_1\",-3.000000000000]", "");
        match parse(&text) {
            Err(TextError::MissingParameter { name, .. }) => assert_eq!(name, "elt_1_1"),
            other => panic!("expected missing elt_1_1, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_and_unknown() {
        let dup = write(&GEO).replace("PARAMETER[\"num_col\",3]", "PARAMETER[\"num_row\",2]");
        assert!(matches!(parse(&dup), Err(TextError::DuplicateParameter { .. })));

        let unknown = write(&GEO).replace("elt_1_2", "elt_2_2");
        assert!(matches!(parse(&unknown), Err(TextError::UnknownParameter { .. })));
    }

    #[test]
    fn rejects_other_transforms() {
        let text = write(&GEO).replace("\"Affine\"", "\"Mercator\"");
        assert!(matches!(parse(&text), Err(TextError::UnsupportedTransform { .. })));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse("PARAM_MT[\"Affine\""), Err(TextError::Syntax { .. })));
        assert!(matches!(parse(""), Err(TextError::Syntax { .. })));
        assert!(matches!(parse("INVERSE_MT[]"), Err(TextError::Syntax { .. })));
    }
}
