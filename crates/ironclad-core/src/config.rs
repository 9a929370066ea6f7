//! Configuration structs for the arena, tanks, and obstacles.
//!
//! Defaults model an M1-Abrams-sized tank in a 100 x 75 meter arena
//! stepped at 60 Hz. All lengths are meters, angles radians, speeds
//! meters per second.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Arena and simulation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width in meters.
    pub arena_width: f32,
    /// Arena height in meters.
    pub arena_height: f32,
    /// Thickness of the boundary wall segments.
    pub wall_thickness: f32,

    /// Fixed simulation timestep in seconds.
    pub time_step: f32,
    /// Solver sub-steps per timestep.
    pub sub_steps: usize,

    /// Background color used when clearing a frame.
    pub clear_color: Color,
    /// Pixels per meter for rasterization.
    pub pixel_density: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            arena_width: 100.0,
            arena_height: 75.0,
            wall_thickness: 1.0,
            time_step: 1.0 / 60.0,
            sub_steps: 8,
            clear_color: Color::BLACK,
            pixel_density: 8.0,
        }
    }
}

impl ArenaConfig {
    /// Rasterized image width in pixels.
    pub fn image_width(&self) -> u32 {
        (self.arena_width * self.pixel_density) as u32
    }

    /// Rasterized image height in pixels.
    pub fn image_height(&self) -> u32 {
        (self.arena_height * self.pixel_density) as u32
    }
}

/// Per-tank parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Initial hull center position.
    pub position_x: f32,
    pub position_y: f32,
    /// Initial hull orientation.
    pub angle: f32,

    /// Hull half-length along the forward axis.
    pub body_height: f32,
    /// Hull half-width.
    pub body_width: f32,
    /// Gun half-length.
    pub gun_height: f32,
    /// Gun half-width.
    pub gun_width: f32,
    /// Tread half-width.
    pub tread_width: f32,

    /// Muzzle speed of fired projectiles.
    pub projectile_velocity: f32,

    /// Number of rays per lidar sweep.
    pub lidar_points: usize,
    /// Ray length used by the zero-argument scan.
    pub lidar_range: f32,

    /// Gun collider density. The barrel is nearly massless so the
    /// servo can reposition it without disturbing the hull.
    pub gun_density: f32,

    /// Gun servo proportional gain.
    pub gun_motor_stiffness: f32,
    /// Gun servo damping gain.
    pub gun_motor_damping: f32,
    /// Torque limit of the gun servo.
    pub gun_motor_max_torque: f32,

    /// Commanded gun angle bounds relative to the hull.
    pub gun_angle_min: f32,
    pub gun_angle_max: f32,

    /// Tread speed limit; commands are clamped to `[-max, max]`.
    pub tread_max_speed: f32,

    /* Render parameters */
    pub projectile_color: Color,
    pub lidar_color: Color,
    pub tank_color: Color,
    pub gun_color: Color,
    pub left_tread_color: Color,
    pub right_tread_color: Color,
    /// Lidar dot radius in pixels.
    pub lidar_radius: f32,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            position_x: 0.0,
            position_y: 0.0,
            angle: 0.0,
            body_height: 7.93,
            body_width: 3.66,
            gun_height: 5.805,
            gun_width: 0.20,
            tread_width: 0.40,
            projectile_velocity: 30.0,
            lidar_points: 360,
            lidar_range: 100.0,
            gun_density: 0.001,
            gun_motor_stiffness: 30.0,
            gun_motor_damping: 5.0,
            gun_motor_max_torque: 20.0,
            gun_angle_min: -std::f32::consts::PI,
            gun_angle_max: std::f32::consts::PI,
            tread_max_speed: 15.0,
            projectile_color: Color::GRAY,
            lidar_color: Color::GOLD,
            tank_color: Color::YELLOW,
            gun_color: Color::LIME,
            left_tread_color: Color::CYAN,
            right_tread_color: Color::MAGENTA,
            lidar_radius: 5.0,
        }
    }
}

/// Static circular obstacle parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub position_x: f32,
    pub position_y: f32,
    pub radius: f32,
    pub color: Color,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            position_x: 0.0,
            position_y: 0.0,
            radius: 5.0,
            color: Color::BROWN,
        }
    }
}
