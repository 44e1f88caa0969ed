//! Wind shear solver orchestration.
//!
//! `WindShear` owns the input grid, the derived computational grid and the
//! model parameters, and ties the pipeline stages together per invocation:
//! rotate and re-populate the computational grid for the wind direction,
//! run the spectral kernel, rotate the resulting vector field back to world
//! axes and project it onto the input grid.
//!
//! Results are a single "current" generation: every call to [`WindShear::update`]
//! overwrites the perturbation fields of the previous one. `update` takes
//! `&mut self`, so the single-writer requirement is compiler-enforced.

use crate::buffer::{fill_uncovered, BorderPolyline, BufferSpec};
use crate::error::ShearError;
use crate::grid::{rotate, ComputationalGrid, Field2, InputGrid};
use crate::interp::GridInterpolator;
use crate::spectral::{compute_shear, SpectralParams};

/// Configuration for [`WindShear`].
///
/// All lengths are in the units of the input grid coordinates.
#[derive(Debug, Clone, Copy)]
pub struct WindShearConfig {
    /// Computational grid spacing in x (default 1)
    pub dx: f64,
    /// Computational grid spacing in y (default 1)
    pub dy: f64,
    /// Buffer width around the input grid (default 100)
    pub buffer_width: f64,
    /// Sigmoid decay length in the buffer; `None` derives `buffer_width / 4`
    pub buffer_relaxation: Option<f64>,
    /// Characteristic length scale of topographic features (default 100)
    pub length_scale: f64,
    /// Aerodynamic roughness length (default 0.001)
    pub roughness: f64,
    /// Inner layer height (default 10)
    pub inner_layer_height: f64,
}

impl Default for WindShearConfig {
    fn default() -> Self {
        Self {
            dx: 1.0,
            dy: 1.0,
            buffer_width: 100.0,
            buffer_relaxation: None,
            length_scale: 100.0,
            roughness: 0.001,
            inner_layer_height: 10.0,
        }
    }
}

impl WindShearConfig {
    /// Set the computational grid spacing.
    pub fn with_spacing(mut self, dx: f64, dy: f64) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    /// Set the buffer width.
    pub fn with_buffer_width(mut self, width: f64) -> Self {
        self.buffer_width = width;
        self
    }

    /// Set an explicit buffer relaxation length.
    pub fn with_buffer_relaxation(mut self, relaxation: f64) -> Self {
        self.buffer_relaxation = Some(relaxation);
        self
    }

    /// Set the topographic length scale.
    pub fn with_length_scale(mut self, length_scale: f64) -> Self {
        self.length_scale = length_scale;
        self
    }

    /// Set the aerodynamic roughness length.
    pub fn with_roughness(mut self, roughness: f64) -> Self {
        self.roughness = roughness;
        self
    }

    /// Set the inner layer height.
    pub fn with_inner_layer_height(mut self, height: f64) -> Self {
        self.inner_layer_height = height;
        self
    }
}

/// Solver for 2D wind shear perturbations over topography.
///
/// The spectral solution is only defined on an equidistant grid aligned
/// with the wind, so a rotating computational grid is maintained
/// internally; results are interpolated back onto the input grid.
#[derive(Debug, Clone)]
pub struct WindShear {
    input: InputGrid,
    cgrid: ComputationalGrid,
    buffer: BufferSpec,
    params: SpectralParams,
    /// Input-grid border polyline, fixed for the solver lifetime
    border: BorderPolyline,
    /// Interpolator over the (immutable) input grid, built once
    input_sampler: GridInterpolator,
}

impl WindShear {
    /// Construct a solver for the given input grid and configuration.
    ///
    /// Validates that the coordinate and elevation shapes match and that
    /// the spacing and buffer relaxation are positive. Coordinate
    /// non-degeneracy (a non-zero-area bounding box) is assumed, not
    /// verified.
    pub fn new(x: Field2, y: Field2, z: Field2, config: WindShearConfig) -> Result<Self, ShearError> {
        if y.shape() != x.shape() {
            return Err(ShearError::ShapeMismatch {
                expected: x.shape(),
                found: y.shape(),
            });
        }
        if z.shape() != x.shape() {
            return Err(ShearError::ShapeMismatch {
                expected: x.shape(),
                found: z.shape(),
            });
        }
        if config.dx <= 0.0 {
            return Err(ShearError::InvalidSpacing(config.dx));
        }
        if config.dy <= 0.0 {
            return Err(ShearError::InvalidSpacing(config.dy));
        }
        let buffer = BufferSpec::new(config.buffer_width, config.buffer_relaxation)?;

        let input = InputGrid::new(x, y, z);
        let cgrid = ComputationalGrid::build(&input, config.dx, config.dy, buffer.width);
        let border = BorderPolyline {
            x: input.border_of(&input.x),
            y: input.border_of(&input.y),
            z: input.border_of(&input.z),
        };
        let input_sampler = GridInterpolator::new(&input.x, &input.y);

        Ok(Self {
            input,
            cgrid,
            buffer,
            params: SpectralParams {
                length_scale: config.length_scale,
                roughness: config.roughness,
                inner_layer_height: config.inner_layer_height,
            },
            border,
            input_sampler,
        })
    }

    /// Compute the shear perturbation for a free-stream wind speed and
    /// direction (degrees; any real value, periodic over 360).
    ///
    /// Overwrites the result fields of any previous invocation. Zero speed
    /// is a defined degenerate case yielding all-zero fields.
    pub fn update(&mut self, u0: f64, direction_deg: f64) -> Result<&mut Self, ShearError> {
        if u0 < 0.0 {
            return Err(ShearError::NegativeSpeed(u0));
        }

        self.populate(direction_deg);
        compute_shear(&mut self.cgrid, &self.params, u0);

        // Re-express the vector field in world axes. The grid was rotated,
        // not the vectors, so the same angle applies (about the origin).
        let (dtaux, dtauy) = rotate(&self.cgrid.dtaux, &self.cgrid.dtauy, direction_deg, (0.0, 0.0));
        self.cgrid.dtaux = dtaux;
        self.cgrid.dtauy = dtauy;

        // Project onto the input grid. The computational grid encloses the
        // input grid by construction, so NaN here means the projection lost
        // coverage and must fail loudly.
        let sampler = GridInterpolator::new(&self.cgrid.x, &self.cgrid.y);
        let dtaux_i = sampler.interpolate(&self.cgrid.dtaux, &self.input.x, &self.input.y);
        let dtauy_i = sampler.interpolate(&self.cgrid.dtauy, &self.input.x, &self.input.y);

        let missing = dtaux_i.nan_count() + dtauy_i.nan_count();
        if missing > 0 {
            return Err(ShearError::InterpolationCoverage { missing });
        }

        self.input.dtaux = Some(dtaux_i);
        self.input.dtauy = Some(dtauy_i);
        Ok(self)
    }

    /// Rotate the computational grid to the wind direction and fill its
    /// elevation from the input grid, extrapolating uncovered cells into
    /// the buffer.
    fn populate(&mut self, direction_deg: f64) {
        let (xc, yc) = rotate(&self.cgrid.xi, &self.cgrid.yi, direction_deg, self.cgrid.pivot);
        let mut z = self.input_sampler.interpolate(&self.input.z, &xc, &yc);
        fill_uncovered(&mut z, &xc, &yc, &self.border, &self.buffer);

        self.cgrid.x = xc;
        self.cgrid.y = yc;
        self.cgrid.z = z;
    }

    /// Shear perturbation `(streamwise, cross-stream)` on the input grid.
    ///
    /// Valid only after at least one successful [`WindShear::update`].
    pub fn shear(&self) -> Result<(&Field2, &Field2), ShearError> {
        match (&self.input.dtaux, &self.input.dtauy) {
            (Some(dtaux), Some(dtauy)) => Ok((dtaux, dtauy)),
            _ => Err(ShearError::ResultNotReady),
        }
    }

    /// Read access to the input grid (coordinates, elevation, results).
    pub fn input_grid(&self) -> &InputGrid {
        &self.input
    }

    /// Read access to the computational grid of the latest invocation.
    pub fn computational_grid(&self) -> &ComputationalGrid {
        &self.cgrid
    }
}
