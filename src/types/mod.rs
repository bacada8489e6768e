pub mod trading;
pub mod candle;
pub mod instrument;
pub mod tick;
pub mod position;
pub mod request;
pub mod result;

pub use trading::*;
pub use candle::*;
pub use instrument::*;
pub use tick::*;
pub use position::*;
pub use request::*;
pub use result::*;
