mod bridge_server_test;
