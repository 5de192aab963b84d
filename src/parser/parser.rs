// Valve Scan Parser

use std::{fs, path::Path};

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char as char_p, digit1},
    combinator::{all_consuming, map, map_res},
    error::{context, ContextError, ErrorKind, FromExternalError, ParseError},
    multi::separated_list1,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use thiserror::Error;

use crate::graph::Node;

pub type ScanParserKind<'i> = (&'i str, ErrorKind);

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("read scan file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: could not parse '{rest}'")]
    Syntax { line: usize, rest: String },
}

macro_rules! sp_terminated {
    ($parser:expr) => {
        terminated($parser, sp_p)
    };
}

fn sp_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, &'i str, E> {
    let chars = " \t\r";
    take_while(move |c| chars.contains(c))(input)
}

pub fn id_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, &'i str, E> {
    sp_terminated!(take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'))(input)
}

fn value_p<'i, E>(input: &'i str) -> IResult<&'i str, u32, E>
where
    E: ParseError<&'i str> + FromExternalError<&'i str, std::num::ParseIntError>,
{
    sp_terminated!(map_res(digit1, str::parse::<u32>))(input)
}

fn tunnels_intro_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, &'i str, E> {
    // plural first, or "valve" would leave the trailing 's' behind
    sp_terminated!(alt((
        tag("tunnels lead to valves"),
        tag("tunnels lead to valve"),
        tag("tunnel leads to valves"),
        tag("tunnel leads to valve"),
    )))(input)
}

fn neighbours_p<'i, E: ParseError<&'i str>>(input: &'i str) -> IResult<&'i str, Vec<&'i str>, E> {
    separated_list1(sp_terminated!(char_p(',')), id_p)(input)
}

/// `Valve AA has flow rate=0; tunnels lead to valves DD, II, BB`
pub fn valve_p<'i, E>(input: &'i str) -> IResult<&'i str, Node, E>
where
    E: ParseError<&'i str>
        + ContextError<&'i str>
        + FromExternalError<&'i str, std::num::ParseIntError>,
{
    context(
        "valve",
        map(
            tuple((
                preceded(sp_p, preceded(sp_terminated!(tag("Valve")), id_p)),
                preceded(
                    sp_terminated!(tag("has flow rate")),
                    preceded(sp_terminated!(char_p('=')), value_p),
                ),
                preceded(
                    sp_terminated!(char_p(';')),
                    preceded(tunnels_intro_p, neighbours_p),
                ),
            )),
            |(id, value, neighbours)| Node {
                id: id.to_string(),
                value,
                neighbours: neighbours.into_iter().map(str::to_string).collect(),
            },
        ),
    )(input)
}

/// Parse a whole scan, one valve per non-blank line
pub fn parse_scan(input: &str) -> Result<Vec<Node>, LoadError> {
    let mut nodes: Vec<Node> = Vec::new();
    for (number, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match all_consuming(valve_p::<ScanParserKind>)(line) {
            Ok((_, node)) => nodes.push(node),
            Err(nom::Err::Error((rest, _))) | Err(nom::Err::Failure((rest, _))) => {
                return Err(LoadError::Syntax {
                    line: number + 1,
                    rest: rest.to_string(),
                })
            }
            Err(nom::Err::Incomplete(_)) => {
                return Err(LoadError::Syntax {
                    line: number + 1,
                    rest: line.to_string(),
                })
            }
        }
    }
    tracing::debug!(valves = nodes.len(), "parsed scan");
    Ok(nodes)
}

pub fn load_scan_file<P: AsRef<Path>>(path: P) -> Result<Vec<Node>, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_scan(&content)
}
