mod scenario_tests;
