quantity!(MegawattHours, suffix: "MWh", precision: 2);
