mod call_test;
