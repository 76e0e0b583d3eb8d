//! Parser für Feature-Layer im XML-Format.

use crate::core::{Feature, FeatureId, FeatureLayer, Geometry, Ring, Vertex, VertexKind};
use anyhow::{bail, Context, Result};
use glam::DVec2;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

/// Feature im Aufbau (zwischen `<feature>` und `</feature>`)
struct PendingFeature {
    id: FeatureId,
    locked: bool,
    rings: Vec<Ring>,
}

/// Parsed einen Feature-Layer aus einem XML-String
pub fn parse_layer(xml_content: &str) -> Result<FeatureLayer> {
    let mut reader = Reader::from_str(xml_content);
    reader.config_mut().trim_text(true);

    let mut buffer = Vec::new();

    let mut layer_name: Option<String> = None;
    let mut seen_layer = false;
    let mut features: Vec<Feature> = Vec::new();
    let mut current_feature: Option<PendingFeature> = None;
    let mut current_ring: Option<Ring> = None;

    loop {
        match reader.read_event_into(&mut buffer) {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                let tag = reader.decoder().decode(name.as_ref())?.into_owned();
                let attrs = read_attributes(&reader, e)?;

                match tag.as_str() {
                    "layer" => {
                        seen_layer = true;
                        layer_name = attrs.get("name").cloned();
                    }
                    "feature" => {
                        if current_feature.is_some() {
                            bail!("Verschachteltes <feature> ist nicht erlaubt");
                        }
                        current_feature = Some(start_feature(&attrs)?);
                    }
                    "ring" => {
                        if current_feature.is_none() {
                            bail!("<ring> ausserhalb von <feature>");
                        }
                        if current_ring.is_some() {
                            bail!("Verschachteltes <ring> ist nicht erlaubt");
                        }
                        current_ring = Some(start_ring(&attrs)?);
                    }
                    "v" => {
                        let vertex = parse_vertex(&attrs)?;
                        push_vertex(&mut current_ring, vertex)?;
                    }
                    other => bail!("Unbekanntes Element <{}>", other),
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.name();
                let tag = reader.decoder().decode(name.as_ref())?.into_owned();
                let attrs = read_attributes(&reader, e)?;

                match tag.as_str() {
                    "layer" => {
                        seen_layer = true;
                        layer_name = attrs.get("name").cloned();
                    }
                    "feature" => {
                        if current_feature.is_some() {
                            bail!("Verschachteltes <feature> ist nicht erlaubt");
                        }
                        let pending = start_feature(&attrs)?;
                        features.push(finish_feature(pending));
                    }
                    "ring" => {
                        if current_ring.is_some() {
                            bail!("Verschachteltes <ring> ist nicht erlaubt");
                        }
                        let Some(feature) = current_feature.as_mut() else {
                            bail!("<ring> ausserhalb von <feature>");
                        };
                        feature.rings.push(start_ring(&attrs)?);
                    }
                    "v" => {
                        let vertex = parse_vertex(&attrs)?;
                        push_vertex(&mut current_ring, vertex)?;
                    }
                    other => bail!("Unbekanntes Element <{}>", other),
                }
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let tag = reader.decoder().decode(name.as_ref())?;
                match &*tag {
                    "ring" => {
                        let ring = current_ring.take().context("</ring> ohne <ring>")?;
                        let feature = current_feature
                            .as_mut()
                            .context("</ring> ausserhalb von <feature>")?;
                        feature.rings.push(ring);
                    }
                    "feature" => {
                        if current_ring.is_some() {
                            bail!("</feature> vor </ring>");
                        }
                        let pending = current_feature
                            .take()
                            .context("</feature> ohne <feature>")?;
                        features.push(finish_feature(pending));
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(err).context("Fehler beim Parsen des XML"),
            _ => {}
        }

        buffer.clear();
    }

    if !seen_layer {
        bail!("Kein <layer>-Element gefunden");
    }
    if current_feature.is_some() || current_ring.is_some() {
        bail!("Unvollstaendiges XML: offenes <feature> oder <ring>");
    }

    let mut layer = FeatureLayer::from_features(features)?;
    layer.name = layer_name;
    log::info!("Layer geparst: {} Features", layer.feature_count());
    Ok(layer)
}

fn read_attributes(reader: &Reader<&[u8]>, e: &BytesStart) -> Result<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

fn required<'a>(attrs: &'a HashMap<String, String>, key: &str, element: &str) -> Result<&'a str> {
    attrs
        .get(key)
        .map(String::as_str)
        .with_context(|| format!("Attribut '{}' fehlt an <{}>", key, element))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => bail!("Ungueltiger Wahrheitswert '{}'", value),
    }
}

fn parse_coordinate(attrs: &HashMap<String, String>, key: &str) -> Result<f64> {
    let text = required(attrs, key, "v")?;
    let value: f64 = text
        .trim()
        .parse()
        .with_context(|| format!("Ungueltige Koordinate {}='{}'", key, text))?;
    if !value.is_finite() {
        bail!("Koordinate {}='{}' ist nicht endlich", key, text);
    }
    Ok(value)
}

fn start_feature(attrs: &HashMap<String, String>) -> Result<PendingFeature> {
    let id_text = required(attrs, "id", "feature")?;
    let id: FeatureId = id_text
        .trim()
        .parse()
        .with_context(|| format!("Ungueltige Feature-ID '{}'", id_text))?;
    let locked = match attrs.get("locked") {
        Some(value) => parse_bool(value).with_context(|| format!("Ft. {}: locked", id))?,
        None => false,
    };
    Ok(PendingFeature {
        id,
        locked,
        rings: Vec::new(),
    })
}

fn start_ring(attrs: &HashMap<String, String>) -> Result<Ring> {
    let closed = match attrs.get("closed") {
        Some(value) => parse_bool(value).context("<ring closed>")?,
        None => false,
    };
    Ok(Ring {
        vertices: Vec::new(),
        closed,
    })
}

fn parse_vertex(attrs: &HashMap<String, String>) -> Result<Vertex> {
    let x = parse_coordinate(attrs, "x")?;
    let y = parse_coordinate(attrs, "y")?;
    let z = if attrs.contains_key("z") {
        Some(parse_coordinate(attrs, "z")?)
    } else {
        None
    };
    let kind = match attrs.get("kind") {
        Some(value) => VertexKind::parse(value)
            .with_context(|| format!("Unbekannte Vertex-Art '{}'", value))?,
        None => VertexKind::Line,
    };

    Ok(Vertex {
        position: DVec2::new(x, y),
        z,
        kind,
    })
}

fn push_vertex(current_ring: &mut Option<Ring>, vertex: Vertex) -> Result<()> {
    let Some(ring) = current_ring.as_mut() else {
        bail!("<v> ausserhalb von <ring>");
    };
    ring.vertices.push(vertex);
    Ok(())
}

fn finish_feature(pending: PendingFeature) -> Feature {
    Feature {
        id: pending.id,
        geometry: Geometry::new(pending.rings),
        locked: pending.locked,
    }
}
