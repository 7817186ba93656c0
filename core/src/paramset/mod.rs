//! Parameter Sets

use crate::pbrt::*;
use crate::spectrum::*;
use std::collections::HashMap;
use std::fmt;

/// Stores the values of a named parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSetItem<T> {
    /// The values.
    pub values: Vec<T>,
}

impl<T> ParamSetItem<T> {
    /// Returns a new `ParamSetItem`.
    ///
    /// * `values` - The values.
    pub fn new(values: Vec<T>) -> Self {
        Self { values }
    }
}

/// A hashmap of parameter sets stored by name.
pub type ParamSetMap<T> = HashMap<String, ParamSetItem<T>>;

/// Stores parameter set items of different types in hashmaps.
#[derive(Clone, Default)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<Int>,
    pub floats: ParamSetMap<Float>,
    pub spectra: ParamSetMap<Spectrum>,
    pub strings: ParamSetMap<String>,
}

/// Define a macro that can be used to generate a function for adding/replacing
/// parameter set item.
macro_rules! paramset_add {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&mut self, name: &str, values: &[$t]) {
            self.$paramset
                .insert(String::from(name), ParamSetItem::new(values.to_vec()));
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a single item.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(param) if param.values.len() == 1 => param.values[0].clone(),
                _ => default,
            }
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// parameter set item that is stored as a list.
macro_rules! paramset_find {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str) -> Vec<$t> {
            self.$paramset
                .get(name)
                .map_or_else(Vec::new, |param| param.values.clone())
        }
    };
}

/// Define a macro that can be used to print parameter set items.
macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        let mut names: Vec<_> = $params.keys().collect();
        names.sort();
        for name in names {
            let values: Vec<String> = $params[name].values.iter().map(|v| format!("{}", v)).collect();
            writeln!($formatter, "\"{} {}\" [ {} ]", $param_type, name, values.join(" "))?;
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    paramset_find_one!(find_one_int, Int, ints);
    paramset_find!(find_int, Int, ints);
    paramset_add!(add_int, Int, ints);

    paramset_find_one!(find_one_bool, bool, bools);
    paramset_find!(find_bool, bool, bools);
    paramset_add!(add_bool, bool, bools);

    paramset_find_one!(find_one_float, Float, floats);
    paramset_find!(find_float, Float, floats);
    paramset_add!(add_float, Float, floats);

    paramset_find_one!(find_one_string, String, strings);
    paramset_find!(find_string, String, strings);
    paramset_add!(add_string, String, strings);

    paramset_find_one!(find_one_spectrum, Spectrum, spectra);
    paramset_find!(find_spectrum, Spectrum, spectra);
    paramset_add!(add_spectrum, Spectrum, spectra);

    /// Add/replace an RGB spectrum.
    ///
    /// * `name`   - Parameter name.
    /// * `values` - RGB values in a linear slice; trailing values that do not
    ///              form a full triple are ignored.
    pub fn add_rgb_spectrum(&mut self, name: &str, values: &[Float]) {
        if values.len() % 3 != 0 {
            warn!("RGB spectrum '{}' has {} values; ignoring the excess.", name, values.len());
        }
        let spectra: Vec<Spectrum> = values
            .chunks_exact(3)
            .map(|c| Spectrum::from_rgb(c[0], c[1], c[2]))
            .collect();
        self.spectra.insert(String::from(name), ParamSetItem::new(spectra));
    }
}

impl fmt::Display for ParamSet {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.bools, "bool", f);
        display_param!(self.ints, "integer", f);
        display_param!(self.floats, "float", f);
        display_param!(self.spectra, "color", f);
        display_param!(self.strings, "string", f);
        Ok(())
    }
}
