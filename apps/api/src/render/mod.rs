// CV rendering: HTML generation plus the external PDF/JPEG renderer.

pub mod html;
pub mod renderer;
