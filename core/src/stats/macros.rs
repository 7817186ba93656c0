//! Macros

/// Create a thread local variable to track an `i64` counter across threads.
///
/// * `$title`      - Descriptive title of the statistic that uses `/` as a separator for categories.
///                   For example: "Integrator/Non-finite path throughput".
/// * `$var`        - An identifier for the thread local variable.
/// * `$stats_func` - An identifier for the callback function used by `StatsRegistrar::call_stat_funcs()` to report
///                   to `StatsAccumulator`.
#[macro_export]
macro_rules! stat_counter {
    ($title: expr, $var: ident, $stats_func: ident $(,)?) => {
        thread_local! { pub(crate) static $var: std::cell::RefCell<i64> = std::cell::RefCell::new(0); }

        pub(crate) fn $stats_func(accum: &mut $crate::stats::StatsAccumulator) {
            let val = $var.with(|v| v.replace(0));
            accum.report_counter($title, val);
        }
    };
}

/// Create a thread local variable to track memory usage as a counter across threads.
///
/// * `$title`      - Descriptive title of the statistic.
/// * `$var`        - An identifier for the thread local variable.
/// * `$stats_func` - An identifier for the reporting callback function.
#[macro_export]
macro_rules! stat_memory_counter {
    ($title: expr, $var: ident, $stats_func: ident $(,)?) => {
        thread_local! { pub(crate) static $var: std::cell::RefCell<u64> = std::cell::RefCell::new(0); }

        pub(crate) fn $stats_func(accum: &mut $crate::stats::StatsAccumulator) {
            let val = $var.with(|v| v.replace(0));
            accum.report_memory_counter($title, val);
        }
    };
}

/// Create a thread local variable to track an integer distribution across threads.
///
/// * `$title`      - Descriptive title of the statistic.
/// * `$var`        - An identifier for the thread local variable.
/// * `$stats_func` - An identifier for the reporting callback function.
#[macro_export]
macro_rules! stat_int_distribution {
    ($title: expr, $var: ident, $stats_func: ident $(,)?) => {
        thread_local! {
            pub(crate) static $var: std::cell::RefCell<$crate::stats::StatsDistribution> =
                std::cell::RefCell::new($crate::stats::StatsDistribution::default());
        }

        pub(crate) fn $stats_func(accum: &mut $crate::stats::StatsAccumulator) {
            let val = $var.with(|v| v.replace($crate::stats::StatsDistribution::default()));
            accum.report_int_distribution($title, &val);
        }
    };
}

/// Create thread local variables to track numerator/denominator counts as a percentage across threads.
///
/// * `$title`      - Descriptive title of the statistic.
/// * `$var_num`    - An identifier for the thread local numerator (actual count).
/// * `$var_denom`  - An identifier for the thread local denominator (total count).
/// * `$stats_func` - An identifier for the reporting callback function.
#[macro_export]
macro_rules! stat_percent {
    ($title: expr, $var_num: ident, $var_denom: ident, $stats_func: ident $(,)?) => {
        thread_local! {
            pub(crate) static $var_num: std::cell::RefCell<i64> = std::cell::RefCell::new(0);
            pub(crate) static $var_denom: std::cell::RefCell<i64> = std::cell::RefCell::new(0);
        }

        pub(crate) fn $stats_func(accum: &mut $crate::stats::StatsAccumulator) {
            let num = $var_num.with(|v| v.replace(0));
            let denom = $var_denom.with(|v| v.replace(0));
            accum.report_percentage($title, num, denom);
        }
    };
}

/// Convenience macro to increment a thread local variable for counter/percent statistics.
#[macro_export]
macro_rules! stat_inc {
    ($var: ident, $e: expr) => {
        $var.with(|v| *v.borrow_mut() += $e);
    };
}

/// Convenience macro to report a value to a thread local distribution statistic.
#[macro_export]
macro_rules! stat_dist {
    ($var: ident, $e: expr) => {
        $var.with(|v| v.borrow_mut().report($e));
    };
}

/// Convenience macro to register the callback functions for statistics.
///
/// * `$($func: ident),+` - One or more callback functions created by the `stat_*` macros.
#[macro_export]
macro_rules! stat_register_fns {
    ($($stat_func: ident),+ $(,)?) => {
        /// Call this from a module's top-level constructor to register its statistics once.
        pub(crate) fn register_stats() {
            static REGISTERED: std::sync::Once = std::sync::Once::new();
            REGISTERED.call_once(|| {
                let mut sr = $crate::stats::stats_registrar()
                    .lock()
                    .unwrap_or_else(|e| e.into_inner());
                $(
                    sr.register_stat_func($stat_func);
                )+
            });
        }
    };
}

/// Accumulate this thread's statistics into the global `StatsAccumulator`.
/// Call at the end of each spawned worker thread and once from the main
/// thread after rendering.
#[macro_export]
macro_rules! report_stats {
    () => {{
        let mut accum = $crate::stats::stats_accumulator()
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        $crate::stats::stats_registrar()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .call_stat_funcs(&mut accum);
    }};
}

/// Print the accumulated statistics.
#[macro_export]
macro_rules! print_stats {
    () => {{
        $crate::stats::stats_accumulator()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .print();
    }};
}

/// Clear the accumulated statistics.
#[macro_export]
macro_rules! clear_stats {
    () => {{
        $crate::stats::stats_accumulator()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }};
}
