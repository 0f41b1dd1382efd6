//! Column layouts of Horizons observer tables
//!
//! Horizons prints one whitespace-separated line per time step. Which token
//! holds which quantity depends on the `QUANTITIES` requested, so each table
//! kind gets its own [`ColumnLayout`].

use std::fmt;

/// A quantity printed in an observer table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Time,
    RightAscension,
    Declination,
    Azimuth,
    Elevation,
    LocalSiderealTime,
    Airmass,
    ApparentMagnitude,
    SurfaceBrightness,
    FractionIlluminated,
    AngularWidth,
    ObserverLongitude,
    ObserverLatitude,
    SolarLongitude,
    SolarLatitude,
    SolarRange,
    SolarRangeRate,
    TargetRange,
    TargetRangeRate,
    SunObserverTarget,
    LeadingTrailing,
    SunTargetObserver,
}

impl Column {
    /// Header label Horizons uses for the column
    pub fn label(&self) -> &'static str {
        match self {
            Column::Date => "Date",
            Column::Time => "Time",
            Column::RightAscension => "R.A.",
            Column::Declination => "DEC",
            Column::Azimuth => "Azimuth",
            Column::Elevation => "Elevation",
            Column::LocalSiderealTime => "L_Ap_Sid_Time",
            Column::Airmass => "a-mass",
            Column::ApparentMagnitude => "APmag",
            Column::SurfaceBrightness => "S-brt",
            Column::FractionIlluminated => "Illu%",
            Column::AngularWidth => "Ang-diam",
            Column::ObserverLongitude => "ObsSub-LON",
            Column::ObserverLatitude => "ObsSub-LAT",
            Column::SolarLongitude => "SunSub-LON",
            Column::SolarLatitude => "SunSub-LAT",
            Column::SolarRange => "r",
            Column::SolarRangeRate => "rdot",
            Column::TargetRange => "delta",
            Column::TargetRangeRate => "deldot",
            Column::SunObserverTarget => "S-O-T",
            Column::LeadingTrailing => "/r",
            Column::SunTargetObserver => "S-T-O",
        }
    }

    /// Whether the column holds a number (as opposed to a date, time or flag)
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::Date | Column::Time | Column::LeadingTrailing)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mapping from columns to whitespace-token indices
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    name: &'static str,
    columns: Vec<(Column, usize)>,
}

impl ColumnLayout {
    /// Build a layout from explicit `(column, token index)` pairs
    pub fn new(name: &'static str, columns: Vec<(Column, usize)>) -> Self {
        Self { name, columns }
    }

    /// Full observer table of the target body
    /// (quantities 1,4,7,8,9,10,13,14,15,19,20,23,24)
    pub fn observer_table() -> Self {
        Self::new(
            "observer",
            vec![
                (Column::Date, 0),
                (Column::Time, 1),
                (Column::RightAscension, 3),
                (Column::Declination, 4),
                (Column::Azimuth, 5),
                (Column::Elevation, 6),
                (Column::LocalSiderealTime, 7),
                (Column::Airmass, 8),
                (Column::ApparentMagnitude, 9),
                (Column::SurfaceBrightness, 11),
                (Column::FractionIlluminated, 12),
                (Column::AngularWidth, 13),
                (Column::ObserverLongitude, 14),
                (Column::ObserverLatitude, 15),
                (Column::SolarLongitude, 16),
                (Column::SolarLatitude, 17),
                (Column::SolarRange, 18),
                (Column::SolarRangeRate, 19),
                (Column::TargetRange, 20),
                (Column::TargetRangeRate, 21),
                (Column::SunObserverTarget, 22),
                (Column::LeadingTrailing, 23),
                (Column::SunTargetObserver, 24),
            ],
        )
    }

    /// Position-only table of a body-fixed reference point (quantities 1,20)
    ///
    /// Rows read `DATE TIME FLAGS RA DEC DELTA DELDOT`, with the solar and
    /// lunar presence flags in one token, as in the observer table.
    pub fn axis_table() -> Self {
        Self::new(
            "axis",
            vec![
                (Column::Date, 0),
                (Column::Time, 1),
                (Column::RightAscension, 3),
                (Column::Declination, 4),
                (Column::TargetRange, 5),
                (Column::TargetRangeRate, 6),
            ],
        )
    }

    /// Short name of the layout
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Token index of a column, if the layout has it
    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.columns
            .iter()
            .find(|(c, _)| *c == column)
            .map(|&(_, index)| index)
    }

    /// All `(column, index)` pairs
    pub fn columns(&self) -> impl Iterator<Item = (Column, usize)> + '_ {
        self.columns.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_layout_indices() {
        let layout = ColumnLayout::observer_table();
        assert_eq!(layout.index_of(Column::RightAscension), Some(3));
        assert_eq!(layout.index_of(Column::AngularWidth), Some(13));
        assert_eq!(layout.index_of(Column::TargetRange), Some(20));
        // Token 10 (magnitude extinction) is not mapped
        assert!(layout.columns().all(|(_, index)| index != 10));
    }

    #[test]
    fn test_axis_layout_lacks_photometry() {
        let layout = ColumnLayout::axis_table();
        let observer = ColumnLayout::observer_table();
        assert_eq!(
            layout.index_of(Column::RightAscension),
            observer.index_of(Column::RightAscension)
        );
        assert_eq!(layout.index_of(Column::Declination), Some(4));
        assert_eq!(layout.index_of(Column::TargetRangeRate), Some(6));
        assert_eq!(layout.index_of(Column::AngularWidth), None);
    }

    #[test]
    fn test_numeric_columns() {
        assert!(Column::Declination.is_numeric());
        assert!(!Column::Date.is_numeric());
        assert!(!Column::LeadingTrailing.is_numeric());
    }
}
