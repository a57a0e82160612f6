use smallvec::SmallVec;

use crate::export::cache::CacheKind;
use crate::export::context::ExportContext;
use crate::export::streams::Category;
use crate::export::textures::write_slot_texture;
use crate::foundation::error::ExportResult;
use crate::scene::model::{BlendMode, Channel, Object, Scene, TextureSlot};
use crate::vrscene::record::{Record, Value};

/// Result of compositing one channel.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelValue {
    /// No texture contributes; the entity's own value.
    Constant(Value),
    /// Instance name of a texture or synthesized blend node.
    Texture(String),
}

impl ChannelValue {
    pub fn value(&self) -> Value {
        match self {
            Self::Constant(v) => v.clone(),
            Self::Texture(n) => Value::reference(n.as_str()),
        }
    }

    /// Reference to a named texture output; constants are returned unchanged.
    pub fn output(&self, output: &str) -> Value {
        match self {
            Self::Constant(v) => v.clone(),
            Self::Texture(n) => Value::output(n.as_str(), output),
        }
    }

    pub fn texture(&self) -> Option<&str> {
        match self {
            Self::Texture(n) => Some(n),
            Self::Constant(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
struct Layer {
    value: ChannelValue,
    stencil: bool,
    blend: BlendMode,
    mult: f64,
}

impl Layer {
    /// Full strength with no blend mode: the layer can stand in for the whole stack.
    fn is_passthrough(&self) -> bool {
        self.mult == 1.0 && self.blend == BlendMode::None
    }
}

type Stack = SmallVec<[Layer; 4]>;

/// Collapse the texture slots mapping `channel` into one value.
///
/// `owner` is the resolved name of the entity owning the slots; synthesized nodes are named
/// `TL<owner>_<channel>` and `TB<owner>_<channel><index>`.
pub fn composite_channel(
    ctx: &mut ExportContext<'_>,
    scene: &Scene,
    owner: &str,
    consumer: Option<&Object>,
    channel: Channel,
    default: Value,
    slots: &[TextureSlot],
) -> ExportResult<ChannelValue> {
    let mut stack = Stack::new();
    for slot in slots {
        let Some(mult) = slot.multiplier(channel) else {
            continue;
        };
        let Some(tex) = write_slot_texture(ctx, scene, slot, consumer)? else {
            continue;
        };
        if stack.is_empty() && (mult < 1.0 || slot.blend_mode != BlendMode::None || slot.use_stencil)
        {
            stack.push(Layer {
                value: ChannelValue::Constant(default.clone()),
                stencil: false,
                blend: BlendMode::None,
                mult: 1.0,
            });
        }
        stack.push(Layer {
            value: ChannelValue::Texture(tex),
            stencil: slot.use_stencil,
            blend: slot.blend_mode,
            mult,
        });
    }

    if stack.is_empty() {
        return Ok(ChannelValue::Constant(default));
    }
    let base = format!("{owner}_{}", channel.as_str());
    collapse(ctx, &base, &stack, 0)
}

/// Collapse `layers` bottom to top. Stencil layers split the stack into a `TexBlend` of the
/// collapsed layers below and above, masked by the stencil.
fn collapse(
    ctx: &mut ExportContext<'_>,
    base: &str,
    layers: &[Layer],
    offset: usize,
) -> ExportResult<ChannelValue> {
    let stencil_at = layers.iter().skip(1).position(|l| l.stencil).map(|p| p + 1);
    let Some(pos) = stencil_at else {
        let name = if offset == 0 {
            format!("TL{base}")
        } else {
            format!("TL{base}{offset}")
        };
        return layered(ctx, &name, layers);
    };

    let index = offset + pos;
    let below = layered(ctx, &format!("TL{base}{index}"), &layers[..pos])?;
    let above = &layers[pos + 1..];
    if above.is_empty() {
        return Ok(below);
    }
    let above = collapse(ctx, base, above, index + 1)?;

    let name = format!("TB{base}{index}");
    if ctx.cache.mark(CacheKind::Textures, &name) {
        let rec = Record::new("TexBlend", &name)
            .with("color_a", below.value())
            .with("color_b", above.value())
            .with("blend_amount", layers[pos].value.output("out_intensity"))
            .with("composite", false);
        ctx.write(Category::Textures, &rec)?;
    }
    Ok(ChannelValue::Texture(name))
}

fn layered(
    ctx: &mut ExportContext<'_>,
    name: &str,
    layers: &[Layer],
) -> ExportResult<ChannelValue> {
    if let [only] = layers
        && only.is_passthrough()
    {
        return Ok(only.value.clone());
    }

    if ctx.cache.mark(CacheKind::Textures, name) {
        let rec = Record::new("TexLayered", name)
            .with(
                "textures",
                Value::List(layers.iter().map(|l| l.value.value()).collect()),
            )
            .with(
                "blend_modes",
                Value::List(layers.iter().map(|l| Value::Int(l.blend.code())).collect()),
            )
            .with(
                "opacities",
                Value::List(layers.iter().map(|l| Value::Float(l.mult)).collect()),
            );
        ctx.write(Category::Textures, &rec)?;
    }
    Ok(ChannelValue::Texture(name.to_string()))
}

#[cfg(test)]
#[path = "../../tests/unit/export/compositor.rs"]
mod tests;
