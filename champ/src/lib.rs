//! # champ - Cycle and Value Profiler for 65C02 Assembly
//!
//! champ assembles an instrumented 65C02 program, runs it in an external
//! cycle-counting emulator, and turns the emulator's trace into a report:
//! exclusive cycle cost per subroutine, a value histogram per watch
//! directive, and an animation of the screen.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  run config (YAML)   +   sources with `; @…` directives      │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ assembler listings
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  listing::ListingParser ──► directive::DirectiveCompiler     │
//! │        │ labels                    │ globals, watches        │
//! │        ▼                           ▼                         │
//! │  symbolization::SymbolTable   program::DiskImage             │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ watch registration + image
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │          emulator subprocess (trace lines on stdout)         │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  profiling::TraceProcessor ──frames──► encoder (animation)   │
//! │        │                                                     │
//! │        ▼                                                     │
//! │  trace_data::TraceSummary                                    │
//! │        ├──► analysis (cost table)                            │
//! │        ├──► render (histograms) ──► encoder (still images)   │
//! │        └──► export (HTML report, JSON summary)               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`listing`]: assembler listing records and the listing parser
//! - [`directive`]: `@` directive grammar and compilation into watches
//! - [`symbolization`]: label ↔ address table
//! - [`program`]: memory image, assembler invocation, `instant_rts` patching
//! - [`profiling`]: emulator subprocess, trace decoding, the trace state
//!   machine and the async session loop
//! - [`trace_data`]: cost, sample and frame aggregates
//! - [`render`]: bitmap font, canvas, palette and histogram rendering
//! - [`encoder`]: the external image encoder protocol
//! - [`analysis`]: cost ranking
//! - [`export`]: HTML report and JSON summary
//! - [`config`], [`cli`], [`preflight`], [`pipeline`]: run setup and orchestration
//! - [`domain`]: newtypes and error types
//!
//! ## Directives
//!
//! ```text
//! RX  EQU $8D ; @s16          declare RX as a signed 16-bit global
//!     LDA #0  ; @Au           sample A (unsigned) before this instruction
//!     STA RX  ; @RX(post)     sample RX after it
//!     JSR DOT ; @Au,Xu        2-D histogram of A against X
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod directive;
pub mod domain;
pub mod encoder;
pub mod export;
pub mod listing;
pub mod pipeline;
pub mod preflight;
pub mod profiling;
pub mod program;
pub mod render;
pub mod symbolization;
pub mod trace_data;
