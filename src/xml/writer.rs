//! Writer für Feature-Layer im XML-Format.

use crate::core::{FeatureLayer, Ring, VertexKind};
use anyhow::{bail, Result};

/// Schreibt einen Feature-Layer als XML
///
/// Koordinaten werden verlustfrei geschrieben (kürzeste f64-Darstellung),
/// damit ein erneutes Einlesen dieselbe Geometrie ergibt.
pub fn write_layer(layer: &FeatureLayer) -> Result<String> {
    let mut output = String::new();
    output.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");

    match layer.name {
        Some(ref name) => output.push_str(&format!("<layer name=\"{}\">\n", escape_xml(name))),
        None => output.push_str("<layer>\n"),
    }

    for feature in layer.features_iter() {
        output.push_str(&format!(
            "    <feature id=\"{}\" locked=\"{}\">\n",
            feature.id, feature.locked
        ));
        for ring in &feature.geometry.rings {
            write_ring(&mut output, ring)?;
        }
        output.push_str("    </feature>\n");
    }

    output.push_str("</layer>\n");
    Ok(output)
}

fn write_ring(output: &mut String, ring: &Ring) -> Result<()> {
    output.push_str(&format!("        <ring closed=\"{}\">\n", ring.closed));
    for vertex in &ring.vertices {
        let (x, y) = (vertex.position.x, vertex.position.y);
        if !x.is_finite() || !y.is_finite() || vertex.z.is_some_and(|z| !z.is_finite()) {
            bail!("Nicht-endliche Koordinate kann nicht geschrieben werden");
        }

        output.push_str(&format!("            <v x=\"{}\" y=\"{}\"", x, y));
        if let Some(z) = vertex.z {
            output.push_str(&format!(" z=\"{}\"", z));
        }
        if vertex.kind != VertexKind::Line {
            output.push_str(&format!(" kind=\"{}\"", vertex.kind.as_str()));
        }
        output.push_str("/>\n");
    }
    output.push_str("        </ring>\n");
    Ok(())
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
