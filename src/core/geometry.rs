//! Geometrie-Modell: Vertices mit Segment-Art, Ringe und mehrteilige Geometrien.
//!
//! Vertices werden über einen globalen Index adressiert, der über alle Ringe
//! in Reihenfolge durchzählt. Geschlossene Ringe wiederholen ihren ersten
//! Vertex nicht, die Nachbarschaft läuft stattdessen am Ringende herum.

use super::Circle;
use anyhow::{bail, Result};
use glam::DVec2;

/// Art des Segments, das an einem Vertex anliegt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexKind {
    /// Gerades Segment
    #[default]
    Line,
    /// Kreisbogen: der Vertex ist Zwischenpunkt eines Bogens
    Curve,
}

impl VertexKind {
    /// Name im Dateiformat
    pub fn as_str(self) -> &'static str {
        match self {
            VertexKind::Line => "line",
            VertexKind::Curve => "curve",
        }
    }

    /// Parst den Namen aus dem Dateiformat
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "line" => Some(VertexKind::Line),
            "curve" => Some(VertexKind::Curve),
            _ => None,
        }
    }
}

/// Ein Stützpunkt einer Geometrie
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in der Ebene
    pub position: DVec2,
    /// Optionale Höhe
    pub z: Option<f64>,
    /// Segment-Art
    pub kind: VertexKind,
}

impl Vertex {
    /// Erstellt einen 2D-Vertex
    pub fn new(position: DVec2, kind: VertexKind) -> Self {
        Self {
            position,
            z: None,
            kind,
        }
    }

    /// Vertex eines geraden Segments
    pub fn line(x: f64, y: f64) -> Self {
        Self::new(DVec2::new(x, y), VertexKind::Line)
    }

    /// Bogen-Zwischenpunkt
    pub fn curve(x: f64, y: f64) -> Self {
        Self::new(DVec2::new(x, y), VertexKind::Curve)
    }

    /// Setzt die Höhe
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }
}

/// Geordnete Vertex-Folge (Polygon-Ring oder Linien-Teil)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring {
    /// Vertices in Geometrie-Reihenfolge
    pub vertices: Vec<Vertex>,
    /// Geschlossener Ring: letzter Vertex ist mit dem ersten verbunden
    pub closed: bool,
}

impl Ring {
    /// Erstellt einen offenen Linien-Teil
    pub fn open(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            closed: false,
        }
    }

    /// Erstellt einen geschlossenen Ring (ohne wiederholten Startpunkt)
    pub fn closed(vertices: Vec<Vertex>) -> Self {
        Self {
            vertices,
            closed: true,
        }
    }

    /// Anzahl der Vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Gibt `true` zurück, wenn der Ring keine Vertices hat.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Lokale Indizes von Vorgänger und Nachfolger eines Vertex.
    ///
    /// Geschlossene Ringe laufen herum, offene Teile haben an ihren Enden
    /// keinen vollständigen Nachbarn und liefern `None`.
    pub fn adjacent(&self, local: usize) -> Option<(usize, usize)> {
        let n = self.vertices.len();
        if local >= n {
            return None;
        }
        if self.closed {
            if n < 3 {
                return None;
            }
            Some(((local + n - 1) % n, (local + 1) % n))
        } else if local == 0 || local + 1 >= n {
            None
        } else {
            Some((local - 1, local + 1))
        }
    }
}

/// Achsenparallele Hülle in Weltkoordinaten
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimale Ecke
    pub min: DVec2,
    /// Maximale Ecke
    pub max: DVec2,
}

impl Bounds {
    /// Hülle eines einzelnen Punkts
    pub fn from_point(point: DVec2) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Erweitert die Hülle um einen Punkt
    pub fn include(&mut self, point: DVec2) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Vereinigung zweier Hüllen
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Um `distance` in alle Richtungen vergrößerte Hülle
    pub fn expanded(self, distance: f64) -> Bounds {
        let d = DVec2::splat(distance);
        Bounds {
            min: self.min - d,
            max: self.max + d,
        }
    }

    /// Mittelpunkt
    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    /// Halbe Diagonale (Radius des umschließenden Kreises)
    pub fn half_diagonal(&self) -> f64 {
        (self.max - self.min).length() * 0.5
    }

    /// Prüft, ob sich zwei Hüllen berühren oder überlappen
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Mehrteilige Geometrie aus geordneten Ringen
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    /// Ringe bzw. Teile in Reihenfolge
    pub rings: Vec<Ring>,
}

impl Geometry {
    /// Erstellt eine Geometrie aus mehreren Ringen
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    /// Erstellt eine Geometrie mit genau einem Ring
    pub fn from_ring(ring: Ring) -> Self {
        Self { rings: vec![ring] }
    }

    /// Gesamtzahl der Vertices über alle Ringe
    pub fn vertex_count(&self) -> usize {
        self.rings.iter().map(Ring::len).sum()
    }

    /// Alle Vertices in globaler Index-Reihenfolge
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.rings.iter().flat_map(|ring| ring.vertices.iter())
    }

    /// Prüft, ob mindestens ein Vertex als Bogen markiert ist
    pub fn has_curves(&self) -> bool {
        self.vertices().any(|v| v.kind == VertexKind::Curve)
    }

    /// Übersetzt einen globalen Vertex-Index in (Ring, lokaler Index)
    pub fn locate(&self, index: usize) -> Option<(usize, usize)> {
        let mut offset = 0;
        for (ring_idx, ring) in self.rings.iter().enumerate() {
            if index < offset + ring.len() {
                return Some((ring_idx, index - offset));
            }
            offset += ring.len();
        }
        None
    }

    /// Vertex am globalen Index
    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        let (ring, local) = self.locate(index)?;
        self.rings[ring].vertices.get(local)
    }

    /// Ersetzt die Koordinaten genau eines Vertex.
    ///
    /// Die Segment-Art bleibt erhalten. Eine Höhe wird nur übernommen, wenn
    /// der Ziel-Vertex selbst eine Höhe trägt.
    pub fn replace_vertex(&mut self, index: usize, position: DVec2, z: Option<f64>) -> Result<()> {
        if !position.is_finite() {
            bail!("Ungueltige Zielposition {} fuer Vertex {}", position, index);
        }
        if z.is_some_and(|z| !z.is_finite()) {
            bail!("Ungueltige Zielhoehe {:?} fuer Vertex {}", z, index);
        }
        let count = self.vertex_count();
        let Some((ring, local)) = self.locate(index) else {
            bail!(
                "Vertex-Index {} ausserhalb der Geometrie ({} Vertices)",
                index,
                count
            );
        };

        let vertex = &mut self.rings[ring].vertices[local];
        vertex.position = position;
        if vertex.z.is_some() && z.is_some() {
            vertex.z = z;
        }
        Ok(())
    }

    /// Hülle aller Vertices, erweitert um die vollständigen Kreise aller Bögen.
    ///
    /// Ein Bogen kann über seine Stützpunkte hinausragen; der volle Kreis
    /// ist eine sichere Obermenge. `None` für leere Geometrien.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        for ring in &self.rings {
            for (local, vertex) in ring.vertices.iter().enumerate() {
                let mut acc = match bounds {
                    Some(b) => b,
                    None => Bounds::from_point(vertex.position),
                };
                acc.include(vertex.position);

                if vertex.kind == VertexKind::Curve {
                    let circle = ring.adjacent(local).and_then(|(prev, next)| {
                        Circle::from_three_points(
                            ring.vertices[prev].position,
                            vertex.position,
                            ring.vertices[next].position,
                            0.0,
                        )
                    });
                    if let Some(circle) = circle {
                        acc = acc.union(circle.bounds());
                    }
                }
                bounds = Some(acc);
            }
        }
        bounds
    }
}
