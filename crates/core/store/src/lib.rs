#[macro_use]
extern crate serde;

#[macro_use]
extern crate log;

#[macro_use]
extern crate ember_result;

macro_rules! database_derived {
    ( $( $item:item )+ ) => {
        $(
            #[derive(Clone)]
            $item
        )+
    };
}

macro_rules! auto_derived {
    ( $( $item:item )+ ) => {
        $(
            #[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
            $item
        )+
    };
}

pub mod catalogue;

mod events;
mod map;
mod store;

pub use events::*;
pub use map::*;
pub use store::*;
