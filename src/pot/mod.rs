//! Savings pots: a named savings goal with a target and a running total,
//! plus the balance engine that moves money in and out.

pub mod balance;
mod core;
mod endpoints;

pub use core::{
    NewPot, Pot, PotView, create_pot, delete_pot, get_pot, get_pots_by_user, update_pot,
};
pub use endpoints::{
    create_pot_endpoint, delete_pot_endpoint, deposit_endpoint, get_pot_endpoint, get_pots,
    update_pot_endpoint, withdraw_endpoint,
};
