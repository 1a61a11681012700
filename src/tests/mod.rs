//! Curated end-to-end problem instances (spec section 8), kept as their own
//! integration module the way `copters::tests::maros_mezaros` keeps curated QP
//! cases separate from the unit tests living next to the code they exercise.
