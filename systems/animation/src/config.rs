//! Viewer configuration and the screen layout derived from it.

use astarcraft_core::GridSize;
use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

/// Stacking order of every visual layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZLayers {
    /// Full-screen backdrop.
    pub background: i32,
    /// Floor tiles.
    pub floor: i32,
    /// Arrow markers.
    pub arrow: i32,
    /// Grid lines.
    pub grid: i32,
    /// Robots and their id labels.
    pub robot: i32,
    /// Edge portal markers.
    pub portal: i32,
}

impl Default for ZLayers {
    fn default() -> Self {
        Self {
            background: 0,
            floor: 1,
            arrow: 2,
            grid: 3,
            robot: 4,
            portal: 5,
        }
    }
}

/// Tunable presentation parameters of the viewer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Width of the grid area in pixels.
    pub viewer_width: f32,
    /// Height of the grid area in pixels.
    pub viewer_height: f32,
    /// Horizontal offset of the grid from the screen origin.
    pub offset_x: f32,
    /// Vertical offset of the grid from the screen origin.
    pub offset_y: f32,
    /// Robot diameter as a fraction of the cell width.
    pub robot_size_ratio: f32,
    /// Native size of the robot image in pixels.
    pub robot_image_size: f32,
    /// Arrow length as a fraction of the cell width.
    pub arrow_size_ratio: f32,
    /// Native size of the arrow image in pixels.
    pub arrow_image_size: f32,
    /// Native size of a floor tile image in pixels.
    pub tile_image_size: f32,
    /// Native size of the portal image in pixels.
    pub portal_image_size: f32,
    /// Scale applied to the background image.
    pub background_scale: f32,
    /// Grid line color as `0xRRGGBB`.
    pub grid_color: u32,
    /// Grid line opacity.
    pub grid_alpha: f32,
    /// Tint applied to portal markers as `0xRRGGBB`.
    pub portal_tint: u32,
    /// Tint dimming arrows present when the scene was built, as `0xRRGGBB`.
    pub initial_arrow_tint: u32,
    /// Fill color of robot id labels and the score, as `0xRRGGBB`.
    pub text_color: u32,
    /// Number of interchangeable floor tile images.
    pub floor_variants: u8,
    /// Seed of the floor tile picker.
    pub floor_seed: u64,
    /// Position of the static "Score" caption.
    pub score_caption_position: [f32; 2],
    /// Position of the score value label.
    pub score_value_position: [f32; 2],
    /// Stacking order of every layer.
    pub layers: ZLayers,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewer_width: 1900.0,
            viewer_height: 1000.0,
            offset_x: 10.0,
            offset_y: 68.0,
            robot_size_ratio: 0.75,
            robot_image_size: 154.0,
            arrow_size_ratio: 0.70,
            arrow_image_size: 140.0,
            tile_image_size: 64.0,
            portal_image_size: 512.0,
            background_scale: 2.0,
            grid_color: 0xffffff,
            grid_alpha: 0.15,
            portal_tint: 0x00eeff,
            initial_arrow_tint: 0x888888,
            text_color: 0xffffff,
            floor_variants: 2,
            floor_seed: 0x5eed_f100_7115_0001,
            score_caption_position: [10.0, 20.0],
            score_value_position: [100.0, 20.0],
            layers: ZLayers::default(),
        }
    }
}

impl ViewerConfig {
    /// Parses a configuration from TOML, filling omitted fields with defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that would produce degenerate scenes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("viewer_width", self.viewer_width),
            ("viewer_height", self.viewer_height),
            ("robot_image_size", self.robot_image_size),
            ("arrow_image_size", self.arrow_image_size),
            ("tile_image_size", self.tile_image_size),
            ("portal_image_size", self.portal_image_size),
        ];
        if let Some((field, value)) = sizes
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value <= 0.0)
        {
            return Err(ConfigError::NonPositive { field, value });
        }

        if self.floor_variants == 0 {
            return Err(ConfigError::NoFloorVariants);
        }

        Ok(())
    }

    /// Derives pixel metrics for a grid of the provided size.
    pub fn layout(&self, size: GridSize) -> Result<ViewerLayout, ConfigError> {
        self.validate()?;
        if size.columns() == 0 || size.rows() == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: size.columns(),
                rows: size.rows(),
            });
        }

        let cell_width = self.viewer_width / size.columns() as f32;
        let cell_height = self.viewer_height / size.rows() as f32;
        let robot_size = (cell_width * self.robot_size_ratio).round();
        let arrow_size = (cell_width * self.arrow_size_ratio).round();

        Ok(ViewerLayout {
            size,
            cell_width,
            cell_height,
            offset: Vec2::new(self.offset_x, self.offset_y),
            robot_scale: robot_size / self.robot_image_size,
            arrow_scale: arrow_size / self.arrow_image_size,
            tile_scale: cell_width / self.tile_image_size,
            portal_scale: cell_width / self.portal_image_size,
        })
    }
}

/// Pixel metrics of the grid on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerLayout {
    size: GridSize,
    cell_width: f32,
    cell_height: f32,
    offset: Vec2,
    robot_scale: f32,
    arrow_scale: f32,
    tile_scale: f32,
    portal_scale: f32,
}

impl ViewerLayout {
    /// Dimensions of the grid the layout was derived for.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Width of a single cell in pixels.
    #[must_use]
    pub const fn cell_width(&self) -> f32 {
        self.cell_width
    }

    /// Height of a single cell in pixels.
    #[must_use]
    pub const fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Scale that fits the robot image to its display size.
    #[must_use]
    pub const fn robot_scale(&self) -> f32 {
        self.robot_scale
    }

    /// Scale that fits the arrow image to its display size.
    #[must_use]
    pub const fn arrow_scale(&self) -> f32 {
        self.arrow_scale
    }

    /// Scale that fits a floor tile to a cell.
    #[must_use]
    pub const fn tile_scale(&self) -> f32 {
        self.tile_scale
    }

    /// Scale that fits the portal image to a cell edge.
    #[must_use]
    pub const fn portal_scale(&self) -> f32 {
        self.portal_scale
    }

    /// Top-left pixel of the cell.
    #[must_use]
    pub fn cell_origin(&self, column: i32, row: i32) -> Vec2 {
        self.offset + Vec2::new(column as f32 * self.cell_width, row as f32 * self.cell_height)
    }

    /// Center pixel of the cell; accepts coordinates outside the grid.
    #[must_use]
    pub fn cell_center(&self, column: i32, row: i32) -> Vec2 {
        self.cell_origin(column, row) + Vec2::new(self.cell_width, self.cell_height) * 0.5
    }

    /// Top-left pixel of the grid.
    #[must_use]
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }
}

/// Errors raised while loading or applying the viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse viewer configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A size that must be positive was zero, negative or not finite.
    #[error("{field} must be positive (received {value})")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// At least one floor tile image is required.
    #[error("floor_variants must be at least 1")]
    NoFloorVariants,
    /// The grid has no cells to lay out.
    #[error("grid of {columns}x{rows} cells cannot be laid out")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
}
