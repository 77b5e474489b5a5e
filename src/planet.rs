//! Planet: the generated globe, from mesh to finished regions

use rand::Rng;

use crate::config::PlanetConfig;
use crate::error::Result;
use crate::generation::{generate_planet_mesh, RawMesh};
use crate::mesh::{generate_mesh, paint_surface, shade, vertex_colors, Color, ColorMapper, MeshData, SurfaceColorMapper};
use crate::regions::{claim_islands, create_regions, IslandReport, Region, RegionId, RegionSet};
use crate::rng::{seeded, GameRng};
use crate::terraform::{terraform, TerraformReport};
use crate::topology::{CellType, Face, FaceId, PlanetTopology};

#[cfg(feature = "spatial-index")]
use crate::spatial::FaceIndex;

use glam::Vec3;

/// Range of the random brightness applied to each region's land color
const REGION_SHADE: std::ops::RangeInclusive<f32> = 0.8..=1.2;

/// A generated planet: faces, land and water, and regions
///
/// Generation runs topology construction, vertex jumbling, terraforming,
/// region building and island resolution in that order, all driven by one
/// generator seeded from the configuration.
///
/// # Examples
///
/// ```
/// use rust_globe_conquest::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(42)
///     .planet_size(PlanetSize::Tiny)
///     .build()
///     .unwrap();
///
/// let planet = Planet::generate(config).unwrap();
/// println!("{} faces, {} regions", planet.face_count(), planet.region_count());
///
/// // Every land face belongs to a region
/// for face in planet.faces() {
///     assert_eq!(face.cell_type.is_land(), face.region.is_some());
/// }
/// ```
#[derive(Clone)]
pub struct Planet {
    /// Configuration used to generate this planet
    config: PlanetConfig,

    /// Vertex buffers and face graph
    topology: PlanetTopology,

    /// Region arena, tombstones included
    regions: RegionSet,

    terraform_report: TerraformReport,
    island_report: IslandReport,

    /// Spatial index for fast position-to-face lookups (requires spatial-index feature)
    #[cfg(feature = "spatial-index")]
    face_index: FaceIndex,
}

impl Planet {
    /// Generate a planet on the built-in sphere mesh
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for out-of-range settings and `InvalidMesh` if
    /// the sphere could not be triangulated.
    pub fn generate(config: PlanetConfig) -> Result<Self> {
        let mesh = generate_planet_mesh(&config)?;
        Self::from_mesh(&mesh, config)
    }

    /// Generate a planet on a caller-supplied mesh
    pub fn from_mesh(mesh: &RawMesh, config: PlanetConfig) -> Result<Self> {
        Self::from_buffers(&mesh.positions, &mesh.indices, config)
    }

    /// Generate a planet on flat vertex and index buffers
    ///
    /// The mesh should be a closed triangle sphere centred on the origin.
    /// Vertices may be shared or duplicated per triangle. Adjusted vertex
    /// positions are available afterwards from [`Planet::topology`].
    pub fn from_buffers(positions: &[[f32; 3]], indices: &[u32], config: PlanetConfig) -> Result<Self> {
        config.terraform.validate()?;
        let settings = config.terraform;
        let mut rng = seeded(config.seed);

        let mut topology = PlanetTopology::from_buffers(positions, indices)?;
        topology.jumble_vertices(settings.jumble, &mut rng);

        let terraform_report = terraform(&mut topology, &settings, &mut rng);
        let mut regions = create_regions(topology.faces_mut(), &settings, &mut rng);
        let island_report = claim_islands(topology.faces_mut(), &mut regions, &settings);

        paint_regions(&mut topology, &mut regions, &mut rng);

        #[cfg(feature = "spatial-index")]
        let face_index = FaceIndex::from_topology(&topology);

        tracing::info!(
            seed = config.seed,
            faces = topology.face_count(),
            regions = regions.active_count(),
            water = terraform_report.water_fraction,
            "generated planet"
        );

        Ok(Self {
            config,
            topology,
            regions,
            terraform_report,
            island_report,
            #[cfg(feature = "spatial-index")]
            face_index,
        })
    }

    /// Get the configuration used to generate this planet
    #[inline]
    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    /// Vertex buffers, colocated vertex map and face graph
    #[inline]
    pub fn topology(&self) -> &PlanetTopology {
        &self.topology
    }

    /// All faces, indexed by face ID
    #[inline]
    pub fn faces(&self) -> &[Face] {
        self.topology.faces()
    }

    /// Get a face by ID
    #[inline]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.topology.face(id)
    }

    /// Number of faces
    #[inline]
    pub fn face_count(&self) -> usize {
        self.topology.face_count()
    }

    /// The region arena; skip inactive entries when iterating
    #[inline]
    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    /// Get an active region
    ///
    /// # Errors
    ///
    /// `RegionNotFound` or `RegionInactive`
    pub fn region(&self, id: RegionId) -> Result<&Region> {
        self.regions.active(id)
    }

    /// Number of active regions
    pub fn region_count(&self) -> usize {
        self.regions.active_count()
    }

    /// What terraforming did
    pub fn terraform_report(&self) -> &TerraformReport {
        &self.terraform_report
    }

    /// What island resolution did
    pub fn island_report(&self) -> &IslandReport {
        &self.island_report
    }

    /// Face under a 3D position
    ///
    /// Uses the KD-tree when the `spatial-index` feature is enabled and a
    /// linear scan otherwise. Returns `None` only for an empty planet.
    pub fn face_at(&self, position: Vec3) -> Option<FaceId> {
        #[cfg(feature = "spatial-index")]
        {
            if self.topology.face_count() == 0 {
                return None;
            }
            Some(self.face_index.find_nearest(position))
        }
        #[cfg(not(feature = "spatial-index"))]
        {
            self.topology.nearest_face(position)
        }
    }

    /// Region owning the face under a 3D position; `None` over water
    pub fn region_at(&self, position: Vec3) -> Option<RegionId> {
        self.face_at(position).and_then(|f| self.region_of_face(f))
    }

    /// Region owning a face; `None` for water and unknown faces
    pub fn region_of_face(&self, face: FaceId) -> Option<RegionId> {
        self.topology.face(face).and_then(|f| f.region)
    }

    /// Paint a region and all its faces
    ///
    /// # Errors
    ///
    /// `RegionNotFound` or `RegionInactive`
    pub fn set_region_color(&mut self, id: RegionId, color: Color) -> Result<()> {
        self.regions.active(id)?;
        self.regions.set_color(self.topology.faces_mut(), id, color);
        Ok(())
    }

    /// Per-vertex colors for the renderer
    pub fn vertex_colors(&self) -> Vec<Color> {
        vertex_colors(&self.topology)
    }

    /// Renderer buffers with current positions and colors
    pub fn mesh_data(&self) -> MeshData {
        generate_mesh(&self.topology)
    }
}

/// Water gets the sea color; each region gets the land color at a random brightness
fn paint_regions(topology: &mut PlanetTopology, regions: &mut RegionSet, rng: &mut GameRng) {
    paint_surface(topology, &SurfaceColorMapper);
    let land = SurfaceColorMapper.map_color(&CellType::Land);
    for id in regions.active_ids() {
        let color = shade(land, rng.gen_range(REGION_SHADE));
        regions.set_color(topology.faces_mut(), id, color);
    }
}
