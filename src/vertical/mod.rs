//! Vertical (terrain-following) coordinates.
//!
//! Particle depth is carried as a stretched sigma coordinate in [-1, 0]:
//!
//! - σ = -1 at the bottom (z = -H)
//! - σ = 0 at the free surface (z = η)
//!
//! The physical height is `z = η + (η + H) × σ`; trajectories record the
//! height below the free surface, `(η + H) × σ`.
//!
//! Scalars and horizontal velocities live on the rho levels (cell centers);
//! vertical velocity lives on the w levels (cell faces), offset half a level
//! from the rho levels. Interpolation therefore needs both level sets.
//!
//! # Example
//!
//! ```
//! use ptrack_rs::vertical::{SigmaLevels, SongHaidvogelStretching};
//!
//! let levels = SigmaLevels::new(30, SongHaidvogelStretching::new(4.0, 0.8));
//! assert_eq!(levels.rho().len(), 30);
//! assert_eq!(levels.w().len(), 31);
//!
//! // Surface-trapped particles sit on the top rho level
//! let top = levels.top();
//! assert!(top < 0.0 && top > -0.1);
//! ```

mod sigma;
mod stretching;

pub use sigma::SigmaLevels;
pub use stretching::{SongHaidvogelStretching, Stretching, UniformStretching};
