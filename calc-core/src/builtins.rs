//! Built-in operators, functions and constants.
//!
//! Precedence scale, loosest first:
//!
//! | level | symbols                          |
//! |-------|----------------------------------|
//! | 1     | `\|`                             |
//! | 2     | `&`                              |
//! | 3     | `<` `<=` `>` `>=` `==` `!=`      |
//! | 4     | `+` `-`                          |
//! | 5     | `*` `/` `%`                      |
//! | 6     | `^`                              |
//! | 7     | `!` and every named function     |
//!
//! Logical and comparison operators produce 0 or 1; any non-zero
//! operand counts as true.

use std::f64::consts::{E, PI, TAU};

use log::debug;

use crate::registry::{Function, Registry};

/// Metadata about a single builtin symbol.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinDescriptor {
    pub name: &'static str,
    pub arity: usize,
    pub precedence: u32,
    pub implementation: fn(&[f64]) -> f64,
}

impl BuiltinDescriptor {
    pub fn to_function(&self) -> Function {
        Function::new(self.name, self.arity, self.precedence, self.implementation)
    }
}

const FUNCTION_PRECEDENCE: u32 = 7;

macro_rules! unary {
    ($name:literal, $method:ident) => {
        BuiltinDescriptor {
            name: $name,
            arity: 1,
            precedence: FUNCTION_PRECEDENCE,
            implementation: |args| args[0].$method(),
        }
    };
}

pub const BUILTINS: &[BuiltinDescriptor] = &[
    BuiltinDescriptor {
        name: "|",
        arity: 2,
        precedence: 1,
        implementation: |args| bool_to_f64(truthy(args[0]) || truthy(args[1])),
    },
    BuiltinDescriptor {
        name: "&",
        arity: 2,
        precedence: 2,
        implementation: |args| bool_to_f64(truthy(args[0]) && truthy(args[1])),
    },
    BuiltinDescriptor {
        name: "<",
        arity: 2,
        precedence: 3,
        implementation: |args| bool_to_f64(args[0] < args[1]),
    },
    BuiltinDescriptor {
        name: "<=",
        arity: 2,
        precedence: 3,
        implementation: |args| bool_to_f64(args[0] <= args[1]),
    },
    BuiltinDescriptor {
        name: ">",
        arity: 2,
        precedence: 3,
        implementation: |args| bool_to_f64(args[0] > args[1]),
    },
    BuiltinDescriptor {
        name: ">=",
        arity: 2,
        precedence: 3,
        implementation: |args| bool_to_f64(args[0] >= args[1]),
    },
    BuiltinDescriptor {
        name: "==",
        arity: 2,
        precedence: 3,
        implementation: |args| bool_to_f64(args[0] == args[1]),
    },
    BuiltinDescriptor {
        name: "!=",
        arity: 2,
        precedence: 3,
        implementation: |args| bool_to_f64(args[0] != args[1]),
    },
    BuiltinDescriptor {
        name: "+",
        arity: 2,
        precedence: 4,
        implementation: |args| args[0] + args[1],
    },
    BuiltinDescriptor {
        name: "-",
        arity: 2,
        precedence: 4,
        implementation: |args| args[0] - args[1],
    },
    BuiltinDescriptor {
        name: "*",
        arity: 2,
        precedence: 5,
        implementation: |args| args[0] * args[1],
    },
    BuiltinDescriptor {
        name: "/",
        arity: 2,
        precedence: 5,
        implementation: |args| args[0] / args[1],
    },
    BuiltinDescriptor {
        name: "%",
        arity: 2,
        precedence: 5,
        implementation: |args| args[0] % args[1],
    },
    BuiltinDescriptor {
        name: "^",
        arity: 2,
        precedence: 6,
        implementation: |args| args[0].powf(args[1]),
    },
    BuiltinDescriptor {
        name: "!",
        arity: 1,
        precedence: FUNCTION_PRECEDENCE,
        implementation: |args| gamma(args[0] + 1.0),
    },
    unary!("sin", sin),
    unary!("cos", cos),
    unary!("tan", tan),
    unary!("asin", asin),
    unary!("acos", acos),
    unary!("atan", atan),
    unary!("exp", exp),
    unary!("ln", ln),
    unary!("log10", log10),
    unary!("sqrt", sqrt),
    unary!("abs", abs),
    unary!("floor", floor),
    unary!("ceil", ceil),
    BuiltinDescriptor {
        name: "atan2",
        arity: 2,
        precedence: FUNCTION_PRECEDENCE,
        implementation: |args| args[0].atan2(args[1]),
    },
    BuiltinDescriptor {
        name: "min",
        arity: 2,
        precedence: FUNCTION_PRECEDENCE,
        implementation: |args| args[0].min(args[1]),
    },
    BuiltinDescriptor {
        name: "max",
        arity: 2,
        precedence: FUNCTION_PRECEDENCE,
        implementation: |args| args[0].max(args[1]),
    },
];

pub const CONSTANTS: &[(&str, f64)] = &[("pi", PI), ("e", E)];

/// Registers every builtin function and constant.
///
/// Functions overwrite same-named entries; constants already present
/// are left untouched.
pub fn install(registry: &mut Registry) {
    for builtin in BUILTINS {
        registry.register_function(builtin.to_function());
    }
    for &(name, value) in CONSTANTS {
        if let Err(err) = registry.register_constant(name, value) {
            debug!("keeping existing constant: {err}");
        }
    }
}

fn truthy(value: f64) -> bool {
    value != 0.0
}

fn bool_to_f64(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Γ(x), via the Lanczos approximation (g = 7, 9 coefficients) with the
/// reflection formula below 0.5. Poles at non-positive integers give NaN.
pub fn gamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x <= 0.0 && x == x.floor() {
        return f64::NAN;
    }
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }

    let z = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (z + i as f64);
    }
    let t = z + G + 0.5;
    // t^(z + 0.5) alone overflows for x above ~141; split it around e^-t.
    let half_power = t.powf((z + 0.5) / 2.0);
    TAU.sqrt() * half_power * ((-t).exp() * half_power) * acc
}
