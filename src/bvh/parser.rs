//! BVH text parser
//!
//! A single forward scan over trimmed lines. The `HIERARCHY` section is read by
//! recursive descent (one call per `ROOT`/`JOINT` block); `End Site` leaves are
//! consumed and dropped. The `MOTION` section supplies the frame count, the
//! frame time and the channel rows.
//!
//! Parsing is a pure function of the input: all traversal state lives in a
//! [`LineCursor`] threaded through the recursive calls.

use glam::Vec3;
use smallvec::SmallVec;

use crate::bvh::channels::{ChannelKind, assign_channel_offsets, count_channels};
use crate::bvh::joint::{BvhSkeleton, Joint, JointIndex, MotionClip, ROOT_JOINT};
use crate::errors::{MotionError, Result};

const HIERARCHY: &str = "HIERARCHY";
const MOTION: &str = "MOTION";
const FRAMES: &str = "Frames:";
const FRAME_TIME: &str = "Frame Time:";

/// Lines of an `End Site` block: header, `{`, `OFFSET`, `}`.
const END_SITE_LINES: usize = 4;

/// Read position over pre-split, trimmed lines.
struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            lines: content.lines().map(str::trim).collect(),
            pos: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    #[inline]
    fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    #[inline]
    fn advance(&mut self, count: usize) {
        self.pos = (self.pos + count).min(self.lines.len());
    }

    /// 1-based number of the line under the cursor.
    #[inline]
    fn line_number(&self) -> usize {
        self.pos + 1
    }

    fn skip_blank(&mut self) {
        while self.peek().is_some_and(str::is_empty) {
            self.pos += 1;
        }
    }

    fn error(&self, message: impl Into<String>) -> MotionError {
        MotionError::format(self.line_number(), message)
    }
}

/// Parses BVH text into a [`MotionClip`].
///
/// Channel offsets are assigned before returning, so every joint's
/// `channel_offset` is ready to index frame rows.
///
/// Frame rows whose value count differs from the total channel count (or that
/// contain a non-numeric token) are dropped rather than rejected; a file
/// declaring `N` frames may therefore yield fewer than `N`.
pub fn parse(content: &str) -> Result<MotionClip> {
    let mut cursor = LineCursor::new(content);

    cursor.skip_blank();
    if cursor.peek() != Some(HIERARCHY) {
        return Err(cursor.error("missing HIERARCHY"));
    }
    cursor.advance(1);

    let mut skeleton = BvhSkeleton::new();
    cursor.skip_blank();
    parse_joint(&mut cursor, &mut skeleton, None)?;

    // Anything between the hierarchy and the motion section is ignored.
    loop {
        match cursor.next_line() {
            Some(MOTION) => break,
            Some(_) => {}
            None => return Err(cursor.error("missing MOTION section")),
        }
    }

    cursor.skip_blank();
    let frame_count = parse_header(&mut cursor, FRAMES)?
        .parse::<usize>()
        .map_err(|_| MotionError::format(cursor.line_number() - 1, "invalid Frames count"))?;

    cursor.skip_blank();
    let frame_time = parse_header(&mut cursor, FRAME_TIME)?
        .parse::<f32>()
        .ok()
        .filter(|t| t.is_finite() && *t > 0.0)
        .ok_or_else(|| MotionError::format(cursor.line_number() - 1, "invalid Frame Time"))?;

    assign_channel_offsets(&mut skeleton, ROOT_JOINT, 0);
    let total_channels = count_channels(&skeleton, ROOT_JOINT);

    // The declared count is untrusted; never reserve past the rows present.
    let remaining_lines = cursor.lines.len().saturating_sub(cursor.pos);
    let mut frames = Vec::with_capacity(frame_count.min(remaining_lines));
    let mut rows_seen = 0;
    while rows_seen < frame_count {
        let line_number = cursor.line_number();
        let Some(line) = cursor.next_line() else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        rows_seen += 1;

        match parse_row(line) {
            Some(values) if values.len() == total_channels => frames.push(values),
            Some(values) => log::debug!(
                "Dropping frame row at line {line_number}: {} values, expected {total_channels}",
                values.len()
            ),
            None => log::debug!("Dropping non-numeric frame row at line {line_number}"),
        }
    }

    if frames.len() < frame_count {
        log::debug!(
            "BVH declared {frame_count} frames, accepted {}",
            frames.len()
        );
    }

    Ok(MotionClip {
        skeleton,
        frame_time,
        frames,
        total_channels,
    })
}

/// One `ROOT`/`JOINT` block, including nested joints, up to its closing brace.
fn parse_joint(
    cursor: &mut LineCursor<'_>,
    skeleton: &mut BvhSkeleton,
    parent: Option<JointIndex>,
) -> Result<JointIndex> {
    let header = cursor.peek().unwrap_or_default();
    let name = parse_joint_name(header)
        .ok_or_else(|| cursor.error(format!("invalid joint declaration: '{header}'")))?
        .to_string();
    cursor.advance(1);

    if cursor.peek() != Some("{") {
        return Err(cursor.error(format!("expected '{{' after joint '{name}'")));
    }
    cursor.advance(1);

    let offset = cursor
        .peek()
        .and_then(parse_offset)
        .ok_or_else(|| cursor.error(format!("expected OFFSET for joint '{name}'")))?;
    cursor.advance(1);

    let mut joint = Joint::new(name, offset);
    if let Some(line) = cursor.peek().filter(|l| l.starts_with("CHANNELS")) {
        joint.channels = parse_channels(line).ok_or_else(|| {
            cursor.error(format!("invalid CHANNELS declaration for joint '{}'", joint.name))
        })?;
        cursor.advance(1);
    }

    let name = joint.name.clone();
    let index = skeleton.push(joint, parent);

    loop {
        match cursor.peek() {
            None => {
                return Err(cursor.error(format!("missing '}}' closing joint '{name}'")));
            }
            Some("}") => {
                cursor.advance(1);
                break;
            }
            Some(line) if line.starts_with("JOINT") => {
                parse_joint(cursor, skeleton, Some(index))?;
            }
            Some(line) if line.starts_with("End Site") => cursor.advance(END_SITE_LINES),
            Some(_) => cursor.advance(1),
        }
    }

    Ok(index)
}

fn parse_joint_name(line: &str) -> Option<&str> {
    let (keyword, rest) = line.split_once(char::is_whitespace)?;
    if keyword != "ROOT" && keyword != "JOINT" {
        return None;
    }
    let name = rest.trim();
    (!name.is_empty()).then_some(name)
}

fn parse_offset(line: &str) -> Option<Vec3> {
    let mut parts = line.split_whitespace();
    if parts.next()? != "OFFSET" {
        return None;
    }
    let mut axis = || parts.next()?.parse::<f32>().ok();
    Some(Vec3::new(axis()?, axis()?, axis()?))
}

/// `CHANNELS <n> <name>...`, requiring exactly `n` known channel names.
fn parse_channels(line: &str) -> Option<SmallVec<[ChannelKind; 6]>> {
    let mut parts = line.split_whitespace().skip(1);
    let declared = parts.next()?.parse::<usize>().ok()?;
    let channels = parts
        .map(ChannelKind::from_name)
        .collect::<Option<SmallVec<[ChannelKind; 6]>>>()?;
    (channels.len() == declared).then_some(channels)
}

/// Value of a `Key: value` header line; consumes the line.
fn parse_header<'a>(cursor: &mut LineCursor<'a>, key: &str) -> Result<&'a str> {
    let value = cursor
        .peek()
        .and_then(|line| line.strip_prefix(key))
        .map(str::trim)
        .ok_or_else(|| cursor.error(format!("missing {}", key.trim_end_matches(':'))))?;
    cursor.advance(1);
    Ok(value)
}

fn parse_row(line: &str) -> Option<Vec<f32>> {
    line.split_whitespace()
        .map(|token| token.parse::<f32>().ok())
        .collect()
}
