//! Board layer ids and the visibility rules for each board side.
//!
//! Ids follow the legacy KiCad numbering (see
//! `include/layers_id_colors_and_visibility.h` in the KiCad 4 sources).

use crate::types::{Pad, PadPart, Side};

pub const LAYER_FIRST_COPPER: i64 = 0;
pub const LAYER_LAST_COPPER: i64 = 15;
pub const LAYER_ADHESIVE_BACK: i64 = 16;
pub const LAYER_ADHESIVE_FRONT: i64 = 17;
pub const LAYER_PASTE_BACK: i64 = 18;
pub const LAYER_PASTE_FRONT: i64 = 19;
pub const LAYER_SILKSCREEN_BACK: i64 = 20;
pub const LAYER_SILKSCREEN_FRONT: i64 = 21;
pub const LAYER_SOLDERMASK_BACK_ID: i64 = 22;
pub const LAYER_SOLDERMASK_FRONT_ID: i64 = 23;
pub const LAYER_DRAW: i64 = 24;
pub const LAYER_COMMENT: i64 = 25;
pub const LAYER_ECO1: i64 = 26;
pub const LAYER_ECO2: i64 = 27;
pub const LAYER_EDGE: i64 = 28;

/// Layers with no legacy id (fabrication, courtyard, ...).
pub const LAYER_UNMAPPED: i64 = -1;

pub const LAYER_BACK: u32 = 1 << LAYER_FIRST_COPPER;
pub const LAYER_FRONT: u32 = 1 << LAYER_LAST_COPPER;
pub const LAYER_SOLDERMASK_BACK: u32 = 1 << LAYER_SOLDERMASK_BACK_ID;
pub const LAYER_SOLDERMASK_FRONT: u32 = 1 << LAYER_SOLDERMASK_FRONT_ID;
pub const ALL_COPPER_LAYERS: u32 = 0xFFFF;
pub const ALL_LAYERS: u32 = 0x1FFF_FFFF;

/// Whether a primitive on `layer` is drawn for `side`.
pub fn is_visible(layer: i64, side: Side) -> bool {
    match side {
        Side::Front => matches!(
            layer,
            LAYER_FIRST_COPPER | LAYER_SILKSCREEN_FRONT | LAYER_DRAW | LAYER_COMMENT
        ),
        Side::Back => matches!(layer, LAYER_SILKSCREEN_BACK | LAYER_LAST_COPPER),
    }
}

/// Layer mask of the pad's first attribute part, or every layer when it has none.
pub fn pad_layer_mask(pad: &Pad) -> u32 {
    pad.parts
        .iter()
        .flatten()
        .find_map(|part| match part {
            PadPart::Attribute { layer_mask } => Some(*layer_mask),
            PadPart::Other => None,
        })
        .unwrap_or(ALL_LAYERS)
}

/// Pads follow the solder mask: a pad shows on a side when that side's mask is open.
pub fn is_mask_visible(mask: u32, side: Side) -> bool {
    match side {
        Side::Front => mask & LAYER_SOLDERMASK_FRONT != 0,
        Side::Back => mask & LAYER_SOLDERMASK_BACK != 0,
    }
}

pub fn is_pad_visible(pad: &Pad, side: Side) -> bool {
    is_mask_visible(pad_layer_mask(pad), side)
}

/// Legacy id for a KiCad layer name, accepting both short and long spellings.
pub fn layer_id(name: &str) -> Option<i64> {
    let id = match name {
        "B.Cu" => LAYER_FIRST_COPPER,
        "F.Cu" => LAYER_LAST_COPPER,
        "B.Adhes" | "B.Adhesive" => LAYER_ADHESIVE_BACK,
        "F.Adhes" | "F.Adhesive" => LAYER_ADHESIVE_FRONT,
        "B.Paste" => LAYER_PASTE_BACK,
        "F.Paste" => LAYER_PASTE_FRONT,
        "B.SilkS" | "B.Silkscreen" => LAYER_SILKSCREEN_BACK,
        "F.SilkS" | "F.Silkscreen" => LAYER_SILKSCREEN_FRONT,
        "B.Mask" => LAYER_SOLDERMASK_BACK_ID,
        "F.Mask" => LAYER_SOLDERMASK_FRONT_ID,
        "Dwgs.User" | "User.Drawings" => LAYER_DRAW,
        "Cmts.User" | "User.Comments" => LAYER_COMMENT,
        "Eco1.User" | "User.Eco1" => LAYER_ECO1,
        "Eco2.User" | "User.Eco2" => LAYER_ECO2,
        "Edge.Cuts" => LAYER_EDGE,
        n => {
            // Inner copper: In1.Cu .. In14.Cu
            let inner = n.strip_prefix("In")?.strip_suffix(".Cu")?;
            match inner.parse::<i64>() {
                Ok(i) if (1..LAYER_LAST_COPPER).contains(&i) => i,
                _ => return None,
            }
        }
    };
    Some(id)
}

/// Mask bits for a pad layer name; wildcards cover both sides.
pub fn layer_mask_bits(name: &str) -> u32 {
    let bit = |id: i64| 1u32 << id;
    match name {
        "*.Cu" => ALL_COPPER_LAYERS,
        "*.Mask" => LAYER_SOLDERMASK_BACK | LAYER_SOLDERMASK_FRONT,
        "*.Paste" => bit(LAYER_PASTE_BACK) | bit(LAYER_PASTE_FRONT),
        "*.SilkS" => bit(LAYER_SILKSCREEN_BACK) | bit(LAYER_SILKSCREEN_FRONT),
        "*.Adhes" => bit(LAYER_ADHESIVE_BACK) | bit(LAYER_ADHESIVE_FRONT),
        "F&B.Cu" => LAYER_BACK | LAYER_FRONT,
        n => layer_id(n).map(bit).unwrap_or(0),
    }
}
