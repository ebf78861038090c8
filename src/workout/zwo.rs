//! Zwift workout (`.zwo`) reader.
//!
//! ```xml
//! <workout_file>
//!   <author>coach</author>
//!   <name>Tempo ride</name>
//!   <workout>
//!     <Warmup Duration="300" PowerLow="0.5" PowerHigh="0.75" Cadence="85"/>
//!     <SteadyState Duration="600" Power="0.9" Cadence="95">
//!       <textevent timeoffset="10" message="Settle in"/>
//!     </SteadyState>
//!     <Ramp Duration="120" PowerLow="0.6" PowerHigh="1.0"/>
//!   </workout>
//! </workout_file>
//! ```
//!
//! Only `Warmup`, `SteadyState` and `Cooldown` carry their fields over; other
//! block elements become [`WorkoutBlock::Unsupported`]. Missing or malformed
//! numeric attributes fall back to zero (cadence to none).

use std::str::FromStr;

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{TextEvent, Workout, WorkoutBlock};

#[derive(Debug, thiserror::Error)]
pub enum ZwoError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("Not a Zwift workout (expected <workout_file> root element)")]
    NotAWorkout,
}

enum Field {
    Author,
    Name,
    Description,
}

pub(super) fn parse(content: &str) -> Result<Workout, ZwoError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut workout = Workout::default();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut field: Option<Field> = None;
    // Depth of the direct children of <workout>, while inside it
    let mut block_depth: Option<usize> = None;
    let mut in_steady_state = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let is_start = matches!(event, Event::Start(_));
                let name = e.name();
                let name = name.as_ref();

                if depth == 0 {
                    if name != b"workout_file" {
                        return Err(ZwoError::NotAWorkout);
                    }
                    seen_root = true;
                } else if Some(depth) == block_depth {
                    let block = parse_block(name, e)?;
                    in_steady_state = is_start && matches!(block, WorkoutBlock::SteadyState { .. });
                    workout.blocks.push(block);
                } else if in_steady_state
                    && block_depth.map(|d| d + 1) == Some(depth)
                    && name == b"textevent"
                {
                    let event = TextEvent {
                        time_offset: attr(e, "timeoffset")?.unwrap_or(0),
                        message: string_attr(e, "message")?.unwrap_or_default(),
                    };
                    if let Some(WorkoutBlock::SteadyState { messages, .. }) =
                        workout.blocks.last_mut()
                    {
                        messages.push(event);
                    }
                } else if depth == 1 && is_start {
                    match name {
                        b"author" => field = Some(Field::Author),
                        b"name" => field = Some(Field::Name),
                        b"description" => field = Some(Field::Description),
                        b"workout" => block_depth = Some(depth + 1),
                        _ => {}
                    }
                }

                if is_start {
                    depth += 1;
                }
            }
            Event::Text(text) => {
                if let Some(target) = &field {
                    let value = text.unescape()?.into_owned();
                    match target {
                        Field::Author => workout.author = value,
                        Field::Name => workout.name = value,
                        Field::Description => workout.description = value,
                    }
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                field = None;
                if Some(depth) == block_depth {
                    in_steady_state = false;
                } else if block_depth == Some(depth + 1) {
                    block_depth = None;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ZwoError::NotAWorkout);
    }
    Ok(workout)
}

fn parse_block(name: &[u8], e: &BytesStart) -> Result<WorkoutBlock, ZwoError> {
    let block = match name {
        b"Warmup" => WorkoutBlock::Warmup {
            duration: attr(e, "Duration")?.unwrap_or(0),
            power_low: attr(e, "PowerLow")?.unwrap_or(0.0),
            power_high: attr(e, "PowerHigh")?.unwrap_or(0.0),
            cadence: attr(e, "Cadence")?,
        },
        b"SteadyState" => WorkoutBlock::SteadyState {
            duration: attr(e, "Duration")?.unwrap_or(0),
            power: attr(e, "Power")?.unwrap_or(0.0),
            cadence: attr(e, "Cadence")?,
            messages: Vec::new(),
        },
        b"Cooldown" => WorkoutBlock::Cooldown {
            duration: attr(e, "Duration")?.unwrap_or(0),
            power_low: attr(e, "PowerLow")?.unwrap_or(0.0),
            power_high: attr(e, "PowerHigh")?.unwrap_or(0.0),
            cadence: attr(e, "Cadence")?,
        },
        _ => WorkoutBlock::Unsupported,
    };
    Ok(block)
}

fn string_attr(e: &BytesStart, key: &str) -> Result<Option<String>, ZwoError> {
    match e.try_get_attribute(key)? {
        Some(attribute) => Ok(Some(attribute.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

/// Numeric attribute; unparsable values count as absent.
fn attr<T: FromStr>(e: &BytesStart, key: &str) -> Result<Option<T>, ZwoError> {
    Ok(string_attr(e, key)?.and_then(|v| v.trim().parse().ok()))
}
